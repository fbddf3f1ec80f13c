use crate::auth::hash_password;
use crate::models::{arrival_point, carriage, carriage_type, city, discount_type, route, route_stop, user};
use sea_orm::*;

/// Demo data for local development: two users, three cities with stations,
/// carriage types, one route Moscow -> Tver -> Saint Petersburg with two
/// carriages, and both discount kinds.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    // 1. Users
    let admin_password = hash_password("admin").unwrap();
    let user_password = hash_password("user").unwrap();

    let admin = user::ActiveModel {
        username: Set("admin".to_owned()),
        email: Set("admin@railbook.local".to_owned()),
        password_hash: Set(admin_password),
        role: Set("admin".to_owned()),
        is_blocked: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    };

    let normal_user = user::ActiveModel {
        username: Set("user".to_owned()),
        email: Set("user@railbook.local".to_owned()),
        password_hash: Set(user_password),
        role: Set("user".to_owned()),
        is_blocked: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    };

    user::Entity::insert(admin)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await?;

    user::Entity::insert(normal_user)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await?;

    // 2. Cities and their stations
    let cities = [
        ("Moscow", "Capital"),
        ("Tver", "On the way north"),
        ("Saint Petersburg", "Northern capital"),
    ];

    let mut city_ids = Vec::new();
    for (name, description) in cities {
        let existing = city::Entity::find()
            .filter(city::Column::Name.eq(name))
            .one(db)
            .await?;
        let id = match existing {
            Some(city) => city.id,
            None => {
                city::ActiveModel {
                    name: Set(name.to_owned()),
                    description: Set(Some(description.to_owned())),
                    ..Default::default()
                }
                .insert(db)
                .await?
                .id
            }
        };
        city_ids.push(id);
    }

    let mut point_ids = Vec::new();
    for (city_id, place) in [
        (city_ids[0], "Leningradsky station, platform 1"),
        (city_ids[1], "Tver station, platform 2"),
        (city_ids[2], "Moskovsky station, platform 3"),
    ] {
        let point = arrival_point::ActiveModel {
            city_id: Set(city_id),
            place: Set(place.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        point_ids.push(point.id);
    }

    // 3. Carriage types
    let mut type_ids = Vec::new();
    for (name, description) in [
        ("seated", "Rows of seats"),
        ("coupe", "Closed compartments"),
        ("platzkart", "Open sleeper"),
    ] {
        let carriage_type = carriage_type::ActiveModel {
            name: Set(name.to_owned()),
            description: Set(Some(description.to_owned())),
            ..Default::default()
        }
        .insert(db)
        .await?;
        type_ids.push(carriage_type.id);
    }

    // 4. One route with two stops and two carriages
    let route = route::ActiveModel {
        departure_point_id: Set(point_ids[0]),
        departure_time: Set("2030-06-01 09:00:00".to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (order, point_id, price, arrival_time) in [
        (1, point_ids[1], 900.0, "2030-06-01 10:30:00"),
        (2, point_ids[2], 2200.0, "2030-06-01 13:00:00"),
    ] {
        route_stop::ActiveModel {
            route_id: Set(route.id),
            arrival_point_id: Set(point_id),
            stop_order: Set(order),
            price: Set(price),
            arrival_time: Set(arrival_time.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for (type_id, seats) in [(type_ids[0], 60), (type_ids[1], 36)] {
        carriage::ActiveModel {
            route_id: Set(route.id),
            carriage_type_id: Set(type_id),
            seat_amount: Set(seats),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    // 5. Discount kinds
    discount_type::ActiveModel {
        kind: Set("permanent".to_owned()),
        discount_percent: Set(5.0),
        discount_limit: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    discount_type::ActiveModel {
        kind: Set("limited".to_owned()),
        discount_percent: Set(20.0),
        discount_limit: Set(Some(3)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(())
}
