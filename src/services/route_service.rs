//! Route Builder, Validator and Search Engine.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::models::arrival_point::{self, Entity as ArrivalPoint};
use crate::models::carriage::{self, Entity as Carriage};
use crate::models::carriage_type::Entity as CarriageType;
use crate::models::city::{self, Entity as City};
use crate::models::route::{self, Entity as Route};
use crate::models::route_stop::{self, Entity as RouteStop};
use crate::models::ticket::{self, Entity as Ticket};
use crate::services::seat_service;

use super::{parse_datetime, DATETIME_FORMAT};

pub const MAX_SEAT_AMOUNT: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct StopDto {
    pub arrival_point_id: i32,
    pub price: f64,
    pub arrival_time: String,
}

#[derive(Debug, Deserialize)]
pub struct CarriageDto {
    pub carriage_type_id: i32,
    pub seat_amount: i32,
}

/// Route creation payload. Stops keep their input position: stop_order is
/// assigned 1..N from the sequence, never re-sorted.
#[derive(Debug, Deserialize)]
pub struct CreateRouteDto {
    pub departure_point_id: i32,
    pub departure_time: String,
    pub stops: Vec<StopDto>,
    #[serde(default)]
    pub carriages: Vec<CarriageDto>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRoutesDto {
    pub departure_city: String,
    pub arrival_city: Option<String>,
    pub departure_day: Option<String>, // "%Y-%m-%d"
}

/// Build and persist a route with its stops and carriages in one
/// transaction: readers never observe a committed partial route.
pub async fn create_route(
    db: &DatabaseConnection,
    dto: CreateRouteDto,
) -> Result<(route::Model, Vec<route_stop::Model>), DomainError> {
    let departure_time = parse_datetime(&dto.departure_time, "departure_time")?;

    if dto.stops.is_empty() {
        return Err(DomainError::validation(
            "stops",
            "at least one stop is required",
        ));
    }

    let mut arrival_times = Vec::with_capacity(dto.stops.len());
    for stop in &dto.stops {
        arrival_times.push(parse_datetime(&stop.arrival_time, "arrival_time")?);
    }

    if arrival_times[0] <= departure_time {
        return Err(DomainError::validation(
            "stops",
            "first arrival before departure",
        ));
    }

    for window in dto.stops.windows(2) {
        if window[1].price < window[0].price {
            return Err(DomainError::validation("stops", "invalid stop order"));
        }
    }
    for window in arrival_times.windows(2) {
        if window[1] < window[0] {
            return Err(DomainError::validation("stops", "invalid stop order"));
        }
    }

    ArrivalPoint::find_by_id(dto.departure_point_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("departure point"))?;

    let stop_point_ids: HashSet<i32> = dto.stops.iter().map(|s| s.arrival_point_id).collect();
    let known_points = ArrivalPoint::find()
        .filter(arrival_point::Column::Id.is_in(stop_point_ids.iter().copied().collect::<Vec<_>>()))
        .all(db)
        .await?;
    if known_points.len() != stop_point_ids.len() {
        return Err(DomainError::NotFound("arrival point"));
    }

    for car in &dto.carriages {
        if car.seat_amount > MAX_SEAT_AMOUNT {
            return Err(DomainError::validation(
                "seat_amount",
                "max seat amount is 100",
            ));
        }
        if car.seat_amount < 1 {
            return Err(DomainError::validation(
                "seat_amount",
                "seat amount must be positive",
            ));
        }
        CarriageType::find_by_id(car.carriage_type_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("carriage type"))?;
    }

    let txn = db.begin().await?;

    let saved_route = route::ActiveModel {
        departure_point_id: Set(dto.departure_point_id),
        departure_time: Set(departure_time.format(DATETIME_FORMAT).to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut saved_stops = Vec::with_capacity(dto.stops.len());
    for (index, stop) in dto.stops.iter().enumerate() {
        let saved = route_stop::ActiveModel {
            route_id: Set(saved_route.id),
            arrival_point_id: Set(stop.arrival_point_id),
            stop_order: Set(index as i32 + 1),
            price: Set(stop.price),
            arrival_time: Set(arrival_times[index].format(DATETIME_FORMAT).to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        saved_stops.push(saved);
    }

    for car in &dto.carriages {
        carriage::ActiveModel {
            route_id: Set(saved_route.id),
            carriage_type_id: Set(car.carriage_type_id),
            seat_amount: Set(car.seat_amount),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok((saved_route, saved_stops))
}

/// Route search per the booking rules, as a fixed sequence of predicates
/// over a candidate set keyed by route id (BTreeMap doubles as dedup and
/// stable ordering):
///
/// 1. routes departing from the city,
/// 2. union routes stopping in the city at a non-final stop,
/// 3. optional calendar-day filter (route departure or any stop arrival),
/// 4. optional arrival-city filter,
/// 5. drop routes that already departed relative to `now`.
pub async fn search_routes<C: ConnectionTrait>(
    conn: &C,
    dto: &SearchRoutesDto,
    now: NaiveDateTime,
) -> Result<Vec<route::Model>, DomainError> {
    let departure_city = City::find()
        .filter(city::Column::Name.eq(&dto.departure_city))
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::validation("departure_city", "unknown city"))?;

    let departure_point_ids: Vec<i32> = ArrivalPoint::find()
        .filter(arrival_point::Column::CityId.eq(departure_city.id))
        .all(conn)
        .await?
        .iter()
        .map(|p| p.id)
        .collect();

    let mut candidates: BTreeMap<i32, route::Model> = Route::find()
        .filter(route::Column::DeparturePointId.is_in(departure_point_ids.clone()))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    // A rider cannot board at a route's terminus, so a stop in the
    // departure city only qualifies if its order is not the route maximum.
    let through_stops = RouteStop::find()
        .filter(route_stop::Column::ArrivalPointId.is_in(departure_point_ids))
        .all(conn)
        .await?;
    if !through_stops.is_empty() {
        let through_route_ids: Vec<i32> = through_stops.iter().map(|s| s.route_id).collect();
        let mut max_order: HashMap<i32, i32> = HashMap::new();
        for stop in RouteStop::find()
            .filter(route_stop::Column::RouteId.is_in(through_route_ids))
            .all(conn)
            .await?
        {
            let entry = max_order.entry(stop.route_id).or_insert(0);
            if stop.stop_order > *entry {
                *entry = stop.stop_order;
            }
        }

        let boardable_ids: Vec<i32> = through_stops
            .iter()
            .filter(|s| max_order.get(&s.route_id).copied().unwrap_or(0) != s.stop_order)
            .map(|s| s.route_id)
            .collect();
        for r in Route::find()
            .filter(route::Column::Id.is_in(boardable_ids))
            .all(conn)
            .await?
        {
            candidates.entry(r.id).or_insert(r);
        }
    }

    let candidate_ids: Vec<i32> = candidates.keys().copied().collect();
    let mut stops_by_route: HashMap<i32, Vec<route_stop::Model>> = HashMap::new();
    if !candidate_ids.is_empty() {
        for stop in RouteStop::find()
            .filter(route_stop::Column::RouteId.is_in(candidate_ids))
            .all(conn)
            .await?
        {
            stops_by_route.entry(stop.route_id).or_default().push(stop);
        }
    }

    if let Some(day_str) = &dto.departure_day {
        let day = NaiveDate::parse_from_str(day_str, "%Y-%m-%d").map_err(|_| {
            DomainError::validation("departure_day", "expected date as '%Y-%m-%d'")
        })?;
        candidates.retain(|id, r| route_touches_day(r, stops_by_route.get(id), day));
    }

    if let Some(arrival_city_name) = &dto.arrival_city {
        let arrival_city = City::find()
            .filter(city::Column::Name.eq(arrival_city_name))
            .one(conn)
            .await?
            .ok_or_else(|| DomainError::validation("arrival_city", "unknown city"))?;
        let arrival_point_ids: HashSet<i32> = ArrivalPoint::find()
            .filter(arrival_point::Column::CityId.eq(arrival_city.id))
            .all(conn)
            .await?
            .iter()
            .map(|p| p.id)
            .collect();

        candidates.retain(|id, _| {
            stops_by_route
                .get(id)
                .map(|stops| {
                    stops
                        .iter()
                        .any(|s| arrival_point_ids.contains(&s.arrival_point_id))
                })
                .unwrap_or(false)
        });
    }

    candidates.retain(|_, r| {
        NaiveDateTime::parse_from_str(&r.departure_time, DATETIME_FORMAT)
            .map(|t| t >= now)
            .unwrap_or(false)
    });

    Ok(candidates.into_values().collect())
}

fn route_touches_day(
    route: &route::Model,
    stops: Option<&Vec<route_stop::Model>>,
    day: NaiveDate,
) -> bool {
    let departs_that_day = NaiveDateTime::parse_from_str(&route.departure_time, DATETIME_FORMAT)
        .map(|t| t.date() == day)
        .unwrap_or(false);
    if departs_that_day {
        return true;
    }

    stops
        .map(|stops| {
            stops.iter().any(|s| {
                NaiveDateTime::parse_from_str(&s.arrival_time, DATETIME_FORMAT)
                    .map(|t| t.date() == day)
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

#[derive(Debug, Serialize)]
pub struct PointView {
    pub id: i32,
    pub place: String,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct StopView {
    pub stop_order: i32,
    pub price: f64,
    pub arrival_time: String,
    pub arrival_point: PointView,
}

/// Enriched route with resolved points, stop list and seat availability.
#[derive(Debug, Serialize)]
pub struct RouteView {
    pub id: i32,
    pub departure_time: String,
    pub departure_point: PointView,
    pub stops: Vec<StopView>,
    pub full_price: f64,
    pub available_seats_amount: i64,
}

/// Resolve routes into API views with related data fetched in bulk.
pub async fn route_views<C: ConnectionTrait>(
    conn: &C,
    routes: Vec<route::Model>,
) -> Result<Vec<RouteView>, DomainError> {
    let route_ids: Vec<i32> = routes.iter().map(|r| r.id).collect();

    let mut stops_by_route: HashMap<i32, Vec<route_stop::Model>> = HashMap::new();
    if !route_ids.is_empty() {
        for stop in RouteStop::find()
            .filter(route_stop::Column::RouteId.is_in(route_ids.clone()))
            .order_by_asc(route_stop::Column::StopOrder)
            .all(conn)
            .await?
        {
            stops_by_route.entry(stop.route_id).or_default().push(stop);
        }
    }

    let mut point_ids: HashSet<i32> = routes.iter().map(|r| r.departure_point_id).collect();
    for stops in stops_by_route.values() {
        for stop in stops {
            point_ids.insert(stop.arrival_point_id);
        }
    }

    let mut points: HashMap<i32, (arrival_point::Model, String)> = HashMap::new();
    if !point_ids.is_empty() {
        let points_with_cities = ArrivalPoint::find()
            .filter(arrival_point::Column::Id.is_in(point_ids.into_iter().collect::<Vec<_>>()))
            .find_also_related(City)
            .all(conn)
            .await?;
        for (point, city) in points_with_cities {
            let city_name = city
                .map(|c| c.name)
                .unwrap_or_else(|| "Unknown".to_string());
            points.insert(point.id, (point, city_name));
        }
    }

    let mut carriages_by_route: HashMap<i32, Vec<carriage::Model>> = HashMap::new();
    let mut taken_by_carriage: HashMap<i32, i64> = HashMap::new();
    if !route_ids.is_empty() {
        let carriages = Carriage::find()
            .filter(carriage::Column::RouteId.is_in(route_ids))
            .all(conn)
            .await?;
        let carriage_ids: Vec<i32> = carriages.iter().map(|c| c.id).collect();
        if !carriage_ids.is_empty() {
            for ticket in Ticket::find()
                .filter(ticket::Column::CarriageId.is_in(carriage_ids))
                .all(conn)
                .await?
            {
                *taken_by_carriage.entry(ticket.carriage_id).or_insert(0) += 1;
            }
        }
        for car in carriages {
            carriages_by_route.entry(car.route_id).or_default().push(car);
        }
    }

    let point_view = |id: i32| {
        points
            .get(&id)
            .map(|(p, city)| PointView {
                id: p.id,
                place: p.place.clone(),
                city: city.clone(),
            })
            .unwrap_or_else(|| PointView {
                id,
                place: "Unknown".to_string(),
                city: "Unknown".to_string(),
            })
    };

    let mut views = Vec::with_capacity(routes.len());
    for route in &routes {
        let stops = stops_by_route.remove(&route.id).unwrap_or_default();
        let full_price = stops.last().map(|s| s.price).unwrap_or(0.0);
        let available_seats_amount: i64 = carriages_by_route
            .get(&route.id)
            .map(|cars| {
                cars.iter()
                    .map(|c| {
                        c.seat_amount as i64 - taken_by_carriage.get(&c.id).copied().unwrap_or(0)
                    })
                    .sum()
            })
            .unwrap_or(0);

        views.push(RouteView {
            id: route.id,
            departure_time: route.departure_time.clone(),
            departure_point: point_view(route.departure_point_id),
            stops: stops
                .into_iter()
                .map(|s| StopView {
                    stop_order: s.stop_order,
                    price: s.price,
                    arrival_time: s.arrival_time,
                    arrival_point: point_view(s.arrival_point_id),
                })
                .collect(),
            full_price,
            available_seats_amount,
        });
    }

    Ok(views)
}

#[derive(Debug, Serialize)]
pub struct CarriageView {
    pub id: i32,
    pub carriage_type: String,
    pub seat_amount: i32,
    pub available_seats: Vec<i32>,
}

/// Carriages of one route with their type names and free seats.
pub async fn route_carriages<C: ConnectionTrait>(
    conn: &C,
    route_id: i32,
) -> Result<Vec<CarriageView>, DomainError> {
    Route::find_by_id(route_id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound("route"))?;

    let carriages_with_types = Carriage::find()
        .filter(carriage::Column::RouteId.eq(route_id))
        .find_also_related(CarriageType)
        .all(conn)
        .await?;

    let mut views = Vec::with_capacity(carriages_with_types.len());
    for (car, car_type) in carriages_with_types {
        let available_seats = seat_service::available_seats(conn, &car).await?;
        views.push(CarriageView {
            id: car.id,
            carriage_type: car_type
                .map(|t| t.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            seat_amount: car.seat_amount,
            available_seats,
        });
    }

    Ok(views)
}
