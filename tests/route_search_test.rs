use chrono::NaiveDateTime;
use railbook::db;
use railbook::domain::DomainError;
use railbook::models::{arrival_point, carriage, city, route, route_stop};
use railbook::services::route_service::{
    self, CarriageDto, CreateRouteDto, SearchRoutesDto, StopDto,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_city(db: &DatabaseConnection, name: &str) -> i32 {
    city::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create city")
    .id
}

async fn create_test_point(db: &DatabaseConnection, city_id: i32, place: &str) -> i32 {
    arrival_point::ActiveModel {
        city_id: Set(city_id),
        place: Set(place.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create arrival point")
    .id
}

async fn create_test_route(
    db: &DatabaseConnection,
    departure_point_id: i32,
    departure_time: &str,
    stops: &[(i32, f64, &str)],
) -> i32 {
    let route = route::ActiveModel {
        departure_point_id: Set(departure_point_id),
        departure_time: Set(departure_time.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create route");

    for (index, (point_id, price, arrival_time)) in stops.iter().enumerate() {
        route_stop::ActiveModel {
            route_id: Set(route.id),
            arrival_point_id: Set(*point_id),
            stop_order: Set(index as i32 + 1),
            price: Set(*price),
            arrival_time: Set(arrival_time.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create stop");
    }

    route.id
}

fn at(datetime: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn search(departure: &str) -> SearchRoutesDto {
    SearchRoutesDto {
        departure_city: departure.to_string(),
        arrival_city: None,
        departure_day: None,
    }
}

// ---------------------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_route_assigns_orders_and_carriages() {
    let db = setup_test_db().await;
    let city_id = create_test_city(&db, "Moscow").await;
    let origin = create_test_point(&db, city_id, "origin").await;
    let p1 = create_test_point(&db, city_id, "first").await;
    let p2 = create_test_point(&db, city_id, "second").await;

    let carriage_type = railbook::models::carriage_type::ActiveModel {
        name: Set("coupe".to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let (route, stops) = route_service::create_route(
        &db,
        CreateRouteDto {
            departure_point_id: origin,
            departure_time: "2030-01-01 09:00:00".to_string(),
            stops: vec![
                StopDto {
                    arrival_point_id: p1,
                    price: 10.0,
                    arrival_time: "2030-01-01 10:00:00".to_string(),
                },
                StopDto {
                    arrival_point_id: p2,
                    price: 25.0,
                    arrival_time: "2030-01-01 11:00:00".to_string(),
                },
            ],
            carriages: vec![CarriageDto {
                carriage_type_id: carriage_type.id,
                seat_amount: 40,
            }],
        },
    )
    .await
    .expect("Failed to create route");

    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].stop_order, 1);
    assert_eq!(stops[1].stop_order, 2);
    assert_eq!(stops[0].arrival_point_id, p1);

    let carriages = carriage::Entity::find().all(&db).await.unwrap();
    assert_eq!(carriages.len(), 1);
    assert_eq!(carriages[0].route_id, route.id);
    assert_eq!(carriages[0].seat_amount, 40);
}

#[tokio::test]
async fn test_create_route_rejects_bad_stop_sequences() {
    let db = setup_test_db().await;
    let city_id = create_test_city(&db, "Moscow").await;
    let origin = create_test_point(&db, city_id, "origin").await;
    let p1 = create_test_point(&db, city_id, "first").await;
    let p2 = create_test_point(&db, city_id, "second").await;

    let stop = |point: i32, price: f64, time: &str| StopDto {
        arrival_point_id: point,
        price,
        arrival_time: time.to_string(),
    };

    // Price decreasing
    let err = route_service::create_route(
        &db,
        CreateRouteDto {
            departure_point_id: origin,
            departure_time: "2030-01-01 09:00:00".to_string(),
            stops: vec![
                stop(p1, 20.0, "2030-01-01 10:00:00"),
                stop(p2, 10.0, "2030-01-01 11:00:00"),
            ],
            carriages: vec![],
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, DomainError::validation("stops", "invalid stop order"));

    // Arrival time decreasing
    let err = route_service::create_route(
        &db,
        CreateRouteDto {
            departure_point_id: origin,
            departure_time: "2030-01-01 09:00:00".to_string(),
            stops: vec![
                stop(p1, 10.0, "2030-01-01 11:00:00"),
                stop(p2, 20.0, "2030-01-01 10:00:00"),
            ],
            carriages: vec![],
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, DomainError::validation("stops", "invalid stop order"));

    // First arrival not after departure
    let err = route_service::create_route(
        &db,
        CreateRouteDto {
            departure_point_id: origin,
            departure_time: "2030-01-01 09:00:00".to_string(),
            stops: vec![stop(p1, 10.0, "2030-01-01 09:00:00")],
            carriages: vec![],
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err,
        DomainError::validation("stops", "first arrival before departure")
    );

    // Oversized carriage
    let err = route_service::create_route(
        &db,
        CreateRouteDto {
            departure_point_id: origin,
            departure_time: "2030-01-01 09:00:00".to_string(),
            stops: vec![stop(p1, 10.0, "2030-01-01 10:00:00")],
            carriages: vec![CarriageDto {
                carriage_type_id: 1,
                seat_amount: 101,
            }],
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err,
        DomainError::validation("seat_amount", "max seat amount is 100")
    );

    // Nothing was persisted by the rejected requests
    assert_eq!(route::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(route_stop::Entity::find().count(&db).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Route search
// ---------------------------------------------------------------------------

/// Moscow, Tver, Spb with one station each; r1 Moscow -> Tver -> Spb,
/// r2 Spb -> Tver -> Moscow (Moscow is the terminus), r3 departed in 2020.
struct SearchFixture {
    m1: i32,
    t1: i32,
    s1: i32,
    r1: i32,
    r2: i32,
}

async fn setup_search_fixture(db: &DatabaseConnection) -> SearchFixture {
    let moscow = create_test_city(db, "Moscow").await;
    let tver = create_test_city(db, "Tver").await;
    let spb = create_test_city(db, "Saint Petersburg").await;

    let m1 = create_test_point(db, moscow, "Leningradsky").await;
    let t1 = create_test_point(db, tver, "Tver main").await;
    let s1 = create_test_point(db, spb, "Moskovsky").await;

    let r1 = create_test_route(
        db,
        m1,
        "2030-01-01 10:00:00",
        &[
            (t1, 10.0, "2030-01-01 12:00:00"),
            (s1, 25.0, "2030-01-01 15:00:00"),
        ],
    )
    .await;

    let r2 = create_test_route(
        db,
        s1,
        "2030-01-02 08:00:00",
        &[
            (t1, 10.0, "2030-01-02 10:00:00"),
            (m1, 20.0, "2030-01-02 12:00:00"),
        ],
    )
    .await;

    // Long gone; must never be returned
    create_test_route(db, t1, "2020-01-01 08:00:00", &[(m1, 5.0, "2020-01-01 10:00:00")])
        .await;

    SearchFixture { m1, t1, s1, r1, r2 }
}

#[tokio::test]
async fn test_search_departure_city_excludes_terminus() {
    let db = setup_test_db().await;
    let fx = setup_search_fixture(&db).await;
    let now = at("2030-01-01 00:00:00");

    // Moscow is r2's final stop, so only r1 departs from Moscow
    let from_moscow = route_service::search_routes(&db, &search("Moscow"), now)
        .await
        .unwrap();
    assert_eq!(
        from_moscow.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![fx.r1]
    );

    // Tver is intermediate on both r1 and r2
    let from_tver = route_service::search_routes(&db, &search("Tver"), now)
        .await
        .unwrap();
    assert_eq!(
        from_tver.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![fx.r1, fx.r2]
    );
}

#[tokio::test]
async fn test_search_day_filter_matches_departure_or_stop_arrival() {
    let db = setup_test_db().await;
    let fx = setup_search_fixture(&db).await;
    let now = at("2030-01-01 00:00:00");

    // Overnight route: departs Moscow on the 1st, arrives Tver on the 2nd
    let overnight = create_test_route(
        &db,
        fx.m1,
        "2030-01-01 23:00:00",
        &[(fx.t1, 10.0, "2030-01-02 01:00:00")],
    )
    .await;

    let mut dto = search("Moscow");
    dto.departure_day = Some("2030-01-02".to_string());
    let on_the_2nd = route_service::search_routes(&db, &dto, now).await.unwrap();
    assert_eq!(
        on_the_2nd.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![overnight]
    );

    let mut dto = search("Moscow");
    dto.departure_day = Some("2030-01-01".to_string());
    let on_the_1st = route_service::search_routes(&db, &dto, now).await.unwrap();
    assert_eq!(
        on_the_1st.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![fx.r1, overnight]
    );
}

#[tokio::test]
async fn test_search_arrival_city_filter() {
    let db = setup_test_db().await;
    let fx = setup_search_fixture(&db).await;
    let now = at("2030-01-01 00:00:00");

    let mut dto = search("Tver");
    dto.arrival_city = Some("Saint Petersburg".to_string());
    let to_spb = route_service::search_routes(&db, &dto, now).await.unwrap();
    assert_eq!(to_spb.iter().map(|r| r.id).collect::<Vec<_>>(), vec![fx.r1]);

    let mut dto = search("Tver");
    dto.arrival_city = Some("Moscow".to_string());
    let to_moscow = route_service::search_routes(&db, &dto, now).await.unwrap();
    assert_eq!(
        to_moscow.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![fx.r2]
    );
}

#[tokio::test]
async fn test_search_unknown_cities_fail_validation() {
    let db = setup_test_db().await;
    setup_search_fixture(&db).await;
    let now = at("2030-01-01 00:00:00");

    let err = route_service::search_routes(&db, &search("Atlantis"), now)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::validation("departure_city", "unknown city"));

    let mut dto = search("Moscow");
    dto.arrival_city = Some("Atlantis".to_string());
    let err = route_service::search_routes(&db, &dto, now).await.unwrap_err();
    assert_eq!(err, DomainError::validation("arrival_city", "unknown city"));
}

#[tokio::test]
async fn test_search_dedup_and_idempotency() {
    let db = setup_test_db().await;
    let fx = setup_search_fixture(&db).await;
    let now = at("2030-01-01 00:00:00");

    // Departs from one Moscow station and passes through another: matches
    // both union branches, must appear once.
    let moscow_id = city::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Moscow")
        .unwrap()
        .id;
    let m2 = create_test_point(&db, moscow_id, "Kazansky").await;
    let loop_route = create_test_route(
        &db,
        fx.m1,
        "2030-01-03 09:00:00",
        &[
            (m2, 5.0, "2030-01-03 09:30:00"),
            (fx.s1, 30.0, "2030-01-03 14:00:00"),
        ],
    )
    .await;

    let first = route_service::search_routes(&db, &search("Moscow"), now)
        .await
        .unwrap();
    let first_ids: Vec<i32> = first.iter().map(|r| r.id).collect();
    assert_eq!(first_ids, vec![fx.r1, loop_route]);
    assert_eq!(
        first_ids.iter().filter(|id| **id == loop_route).count(),
        1
    );

    // Same question, same answer
    let second = route_service::search_routes(&db, &search("Moscow"), now)
        .await
        .unwrap();
    assert_eq!(
        second.iter().map(|r| r.id).collect::<Vec<_>>(),
        first_ids
    );
}
