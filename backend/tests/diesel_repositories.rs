//! Integration tests for the Diesel repositories against embedded PostgreSQL.
//!
//! Each test provisions its own database from the migrated template and
//! drives the async repositories on a dedicated Tokio runtime. Timestamps are
//! whole seconds so they survive PostgreSQL's microsecond precision.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use shipment_backend::domain::ports::{
    AdvanceOutcome, AmendOutcome, SessionRepository, ShipmentRepository,
    ShipmentRepositoryError, TrackingEventRepository, TrackingEventRepositoryError,
    UserPersistenceError, UserRepository,
};
use shipment_backend::domain::{
    EmailAddress, ErrorCode, NewShipment, PageRequest, Session, SessionToken, Shipment,
    ShipmentId, ShipmentStatus, StatusAdvance, TrackingEventId, TrackingEventPatch,
    TrackingNumber, User, UserDraft, UserId, UserName, UserRole,
};
use shipment_backend::outbound::persistence::{
    DbPool, DieselSessionRepository, DieselShipmentRepository, DieselTrackingEventRepository,
    DieselUserRepository, PoolConfig,
};

mod support;

use support::embedded_postgres::drop_table;
use support::{handle_cluster_setup_failure, provision_template_database, shared_cluster};

struct Store {
    runtime: Runtime,
    pool: DbPool,
    database_url: String,
    _database: TemporaryDatabase,
}

impl Store {
    fn users(&self) -> DieselUserRepository {
        DieselUserRepository::new(self.pool.clone())
    }

    fn sessions(&self) -> DieselSessionRepository {
        DieselSessionRepository::new(self.pool.clone())
    }

    fn shipments(&self) -> DieselShipmentRepository {
        DieselShipmentRepository::new(self.pool.clone())
    }

    fn events(&self) -> DieselTrackingEventRepository {
        DieselTrackingEventRepository::new(self.pool.clone())
    }
}

fn setup_store() -> Result<Store, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;
    let database_url = database.url().to_string();

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(Store {
        runtime,
        pool,
        database_url,
        _database: database,
    })
}

#[fixture]
fn store() -> Option<Store> {
    match setup_store() {
        Ok(store) => Some(store),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn user(email: &str, role: UserRole) -> User {
    User::new(UserDraft {
        id: UserId::random(),
        name: UserName::new("Diesel Tester").expect("valid name"),
        email: EmailAddress::new(email).expect("valid email"),
        role,
        created_at: at(8),
    })
}

fn shipment(owner: UserId, tracking_number: &str) -> Shipment {
    NewShipment::new(owner, "NYC", "LA")
        .expect("valid shipment")
        .into_shipment(
            ShipmentId::random(),
            TrackingNumber::from_stored(tracking_number.to_owned()),
            at(9),
        )
}

fn pick_up(shipment: &Shipment, actor: UserId, target: &str) -> StatusAdvance {
    StatusAdvance {
        shipment_id: shipment.id,
        actor,
        target: target.to_owned(),
        location: "Newark depot".to_owned(),
        description: Some("Collected".to_owned()),
    }
}

#[rstest]
fn users_round_trip_and_reject_duplicate_email(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: users_round_trip_and_reject_duplicate_email skipped");
        return;
    };
    let repo = store.users();
    let ann = user("ann@example.com", UserRole::Staff);
    let twin = user("ann@example.com", UserRole::Admin);

    store.runtime.block_on(async {
        repo.insert(&ann, "$argon2id$stub").await.expect("insert");
        let duplicate = repo.insert(&twin, "$argon2id$stub").await;
        let by_email = repo
            .find_by_email(ann.email())
            .await
            .expect("lookup")
            .expect("stored account");
        let by_id = repo.find_by_id(&ann.id()).await.expect("lookup");

        assert!(matches!(
            duplicate,
            Err(UserPersistenceError::DuplicateEmail { .. })
        ));
        assert_eq!(by_email.user, ann);
        assert_eq!(by_email.password_hash, "$argon2id$stub");
        assert_eq!(by_id, Some(ann));
    });
}

#[rstest]
fn sessions_are_found_by_fingerprint_and_deleted(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: sessions_are_found_by_fingerprint_and_deleted skipped");
        return;
    };
    let users = store.users();
    let sessions = store.sessions();
    let owner = user("sessions@example.com", UserRole::Staff);
    let token = SessionToken::generate();
    let session = Session {
        fingerprint: token.fingerprint(),
        user_id: owner.id(),
        expires_at: at(9) + TimeDelta::hours(12),
        created_at: at(9),
    };

    store.runtime.block_on(async {
        users.insert(&owner, "hash").await.expect("insert user");
        sessions.insert(&session).await.expect("insert session");
        let found = sessions.find(&token.fingerprint()).await.expect("find");
        sessions.delete(&token.fingerprint()).await.expect("delete");
        let gone = sessions.find(&token.fingerprint()).await.expect("find");
        sessions
            .delete(&token.fingerprint())
            .await
            .expect("deleting twice is harmless");

        assert_eq!(found, Some(session));
        assert!(gone.is_none());
    });
}

#[rstest]
fn shipments_advance_one_step_at_a_time(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: shipments_advance_one_step_at_a_time skipped");
        return;
    };
    let users = store.users();
    let repo = store.shipments();
    let staff = user("staff@example.com", UserRole::Staff);
    let parcel = shipment(staff.id(), "TRK-00000000AA");

    store.runtime.block_on(async {
        users.insert(&staff, "hash").await.expect("insert user");
        repo.insert(&parcel).await.expect("insert shipment");

        let skipped = repo
            .advance_status(
                &pick_up(&parcel, staff.id(), "Delivered"),
                TrackingEventId::random(),
                at(10),
            )
            .await
            .expect("advance runs");
        let applied = repo
            .advance_status(
                &pick_up(&parcel, staff.id(), "PickedUp"),
                TrackingEventId::random(),
                at(10),
            )
            .await
            .expect("advance runs");
        let missing = repo
            .advance_status(
                &StatusAdvance {
                    shipment_id: ShipmentId::random(),
                    ..pick_up(&parcel, staff.id(), "PickedUp")
                },
                TrackingEventId::random(),
                at(10),
            )
            .await
            .expect("advance runs");
        let stored = repo
            .find_by_id(&parcel.id)
            .await
            .expect("lookup")
            .expect("stored shipment");
        let history = repo.list_events(&parcel.id).await.expect("history");

        match skipped {
            AdvanceOutcome::Rejected(err) => assert_eq!(err.code(), ErrorCode::InvalidRequest),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(matches!(applied, AdvanceOutcome::Applied { .. }));
        assert!(matches!(missing, AdvanceOutcome::Missing));
        assert_eq!(stored.status, ShipmentStatus::PickedUp);
        assert_eq!(stored.updated_at, at(10));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].updated_by, staff.id());
    });
}

#[rstest]
fn concurrent_advances_commit_exactly_once(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_advances_commit_exactly_once skipped");
        return;
    };
    let users = store.users();
    let first = store.shipments();
    let second = store.shipments();
    let staff = user("race@example.com", UserRole::Staff);
    let parcel = shipment(staff.id(), "TRK-00000000D1");
    let request = pick_up(&parcel, staff.id(), "PickedUp");

    store.runtime.block_on(async {
        users.insert(&staff, "hash").await.expect("insert user");
        first.insert(&parcel).await.expect("insert shipment");

        let (left, right) = tokio::join!(
            first.advance_status(&request, TrackingEventId::random(), at(10)),
            second.advance_status(&request, TrackingEventId::random(), at(10)),
        );
        let outcomes = [left.expect("advance runs"), right.expect("advance runs")];
        let history = first.list_events(&parcel.id).await.expect("history");

        let applied = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, AdvanceOutcome::Applied { .. }))
            .count();
        let rejected = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, AdvanceOutcome::Rejected(_)))
            .count();
        assert_eq!(applied, 1);
        assert_eq!(rejected, 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, ShipmentStatus::PickedUp);
    });
}

#[rstest]
fn failed_event_insert_rolls_back_status(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: failed_event_insert_rolls_back_status skipped");
        return;
    };
    let users = store.users();
    let repo = store.shipments();
    let staff = user("rollback@example.com", UserRole::Staff);
    let parcel = shipment(staff.id(), "TRK-00000000D2");
    let reused = TrackingEventId::random();

    store.runtime.block_on(async {
        users.insert(&staff, "hash").await.expect("insert user");
        repo.insert(&parcel).await.expect("insert shipment");
        repo.advance_status(&pick_up(&parcel, staff.id(), "PickedUp"), reused, at(10))
            .await
            .expect("first advance");

        let clash = repo
            .advance_status(&pick_up(&parcel, staff.id(), "InTransit"), reused, at(11))
            .await;
        let stored = repo
            .find_by_id(&parcel.id)
            .await
            .expect("lookup")
            .expect("stored shipment");
        let history = repo.list_events(&parcel.id).await.expect("history");

        assert!(matches!(clash, Err(ShipmentRepositoryError::Query { .. })));
        assert_eq!(stored.status, ShipmentStatus::PickedUp);
        assert_eq!(stored.updated_at, at(10));
        assert_eq!(history.len(), 1);
    });
}

#[rstest]
fn stale_clock_keeps_history_in_commit_order(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: stale_clock_keeps_history_in_commit_order skipped");
        return;
    };
    let users = store.users();
    let repo = store.shipments();
    let staff = user("clock@example.com", UserRole::Staff);
    let parcel = shipment(staff.id(), "TRK-00000000D3");

    store.runtime.block_on(async {
        users.insert(&staff, "hash").await.expect("insert user");
        repo.insert(&parcel).await.expect("insert shipment");
        for (target, hour) in [("PickedUp", 12), ("InTransit", 11), ("OutForDelivery", 10)] {
            let outcome = repo
                .advance_status(
                    &pick_up(&parcel, staff.id(), target),
                    TrackingEventId::random(),
                    at(hour),
                )
                .await
                .expect("advance runs");
            assert!(matches!(outcome, AdvanceOutcome::Applied { .. }));
        }

        let stored = repo
            .find_by_id(&parcel.id)
            .await
            .expect("lookup")
            .expect("stored shipment");
        let history = repo.list_events(&parcel.id).await.expect("history");
        let statuses: Vec<_> = history.iter().map(|event| event.status).collect();

        assert_eq!(stored.updated_at, at(12));
        assert_eq!(
            statuses,
            [
                ShipmentStatus::PickedUp,
                ShipmentStatus::InTransit,
                ShipmentStatus::OutForDelivery
            ]
        );
        assert!(history.iter().all(|event| event.created_at == at(12)));
        assert_eq!(history.last().map(|event| event.status), Some(stored.status));
    });
}

#[rstest]
fn tracking_lookup_and_paging(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: tracking_lookup_and_paging skipped");
        return;
    };
    let users = store.users();
    let repo = store.shipments();
    let staff = user("paging@example.com", UserRole::Staff);
    let first = shipment(staff.id(), "TRK-00000000B1");
    let second = shipment(staff.id(), "TRK-00000000B2");
    let clash = shipment(staff.id(), "TRK-00000000B1");

    store.runtime.block_on(async {
        users.insert(&staff, "hash").await.expect("insert user");
        repo.insert(&first).await.expect("insert first");
        repo.insert(&second).await.expect("insert second");
        let duplicate = repo.insert(&clash).await;

        let tracked = repo
            .find_by_tracking_number(&TrackingNumber::normalise("trk-00000000b2"))
            .await
            .expect("lookup");
        let page_one = repo
            .list_page(PageRequest::new(1, 1).expect("valid page"))
            .await
            .expect("page one");
        let page_three = repo
            .list_page(PageRequest::new(3, 1).expect("valid page"))
            .await
            .expect("page three");

        assert!(duplicate.is_err());
        assert_eq!(tracked.map(|found| found.id), Some(second.id));
        assert_eq!(page_one.len(), 1);
        assert!(page_three.is_empty());
    });
}

#[rstest]
fn events_are_amended_in_place(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: events_are_amended_in_place skipped");
        return;
    };
    let users = store.users();
    let shipments = store.shipments();
    let events = store.events();
    let staff = user("amend-staff@example.com", UserRole::Staff);
    let admin = user("amend-admin@example.com", UserRole::Admin);
    let parcel = shipment(staff.id(), "TRK-00000000C1");
    let event_id = TrackingEventId::random();
    let patch = TrackingEventPatch {
        status: None,
        location: Some("Jersey City hub".to_owned()),
        description: None,
    };

    store.runtime.block_on(async {
        users.insert(&staff, "hash").await.expect("insert staff");
        users.insert(&admin, "hash").await.expect("insert admin");
        shipments.insert(&parcel).await.expect("insert shipment");
        shipments
            .advance_status(&pick_up(&parcel, staff.id(), "PickedUp"), event_id, at(10))
            .await
            .expect("advance");

        let amended = events
            .amend(&event_id, &patch, admin.id(), at(11))
            .await
            .expect("amend runs");
        let missing = events
            .amend(&TrackingEventId::random(), &patch, admin.id(), at(11))
            .await
            .expect("amend runs");

        match amended {
            AmendOutcome::Applied(event) => {
                assert_eq!(event.location, "Jersey City hub");
                assert_eq!(event.description, "Collected");
                assert_eq!(event.updated_by, admin.id());
                assert_eq!(event.created_at, at(10));
                assert_eq!(event.updated_at, at(11));
            }
            other => panic!("expected amendment, got {other:?}"),
        }
        assert!(matches!(missing, AmendOutcome::Missing));
    });
}

#[rstest]
fn missing_schema_surfaces_query_errors(store: Option<Store>) {
    let Some(store) = store else {
        eprintln!("SKIP-TEST-CLUSTER: missing_schema_surfaces_query_errors skipped");
        return;
    };
    drop_table(&store.database_url, "tracking_events").expect("drop succeeds");
    let events = store.events();
    let patch = TrackingEventPatch {
        status: Some("InTransit".to_owned()),
        location: None,
        description: None,
    };

    let result = store.runtime.block_on(events.amend(
        &TrackingEventId::random(),
        &patch,
        UserId::random(),
        at(11),
    ));

    assert!(matches!(
        result,
        Err(TrackingEventRepositoryError::Query { .. })
    ));
}
