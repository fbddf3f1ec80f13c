//! Fare Model - derives a segment price from a route's stop list.

use sea_orm::*;

use crate::domain::DomainError;
use crate::models::route;
use crate::models::route_stop::{self, Entity as RouteStop};

/// Price of travelling `departure_point_id` -> `arrival_point_id` on
/// `route`. Stop prices are cumulative from the route's departure, so the
/// segment price is the difference of the two stops' prices; boarding at
/// the route's own departure point counts as price 0.
///
/// Non-negative for any valid pair because stop prices are validated
/// non-decreasing in stop order at route creation.
pub async fn segment_price<C: ConnectionTrait>(
    conn: &C,
    route: &route::Model,
    departure_point_id: i32,
    arrival_point_id: i32,
) -> Result<f64, DomainError> {
    let arrival_stop = RouteStop::find()
        .filter(route_stop::Column::RouteId.eq(route.id))
        .filter(route_stop::Column::ArrivalPointId.eq(arrival_point_id))
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound("arrival point in route"))?;

    let departure_stop = RouteStop::find()
        .filter(route_stop::Column::RouteId.eq(route.id))
        .filter(route_stop::Column::ArrivalPointId.eq(departure_point_id))
        .one(conn)
        .await?;

    let departure_price = match departure_stop {
        Some(stop) => {
            if stop.stop_order >= arrival_stop.stop_order {
                return Err(DomainError::InvalidOrder);
            }
            stop.price
        }
        // Boarding at the route's origin: order 0, price 0.
        None if departure_point_id == route.departure_point_id => 0.0,
        None => return Err(DomainError::NotFound("departure point in route")),
    };

    Ok(arrival_stop.price - departure_price)
}
