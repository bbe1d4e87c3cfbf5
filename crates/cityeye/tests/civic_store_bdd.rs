//! Behaviour-driven development (BDD) tests for the civic store.
//!
//! These scenarios drive the store through the public API over the in-memory
//! adapter: reporting, likes, admin triage and degraded reads.

use std::sync::Arc;

use cityeye::domain::ports::KeyValueStore;
use cityeye::outbound::InMemoryKeyValueStore;
use cityeye::{
    Category, CivicStore, Issue, IssueStatus, IssueSubmission, StatusFilter, StoreError, User,
    UserDraft, UserRole,
};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Wrapper sharing the backend so steps can tamper with raw entries.
#[derive(Clone)]
struct BackendHandle(Arc<InMemoryKeyValueStore>);

/// Test world holding the store, the actors and the last console outcome.
#[derive(Default, ScenarioState)]
struct CivicStoreWorld {
    backend: Slot<BackendHandle>,
    store: Slot<CivicStore<InMemoryKeyValueStore>>,
    citizen: Slot<User>,
    admin: Slot<User>,
    console_result: Slot<Result<(), StoreError>>,
}

impl CivicStoreWorld {
    fn store(&self) -> CivicStore<InMemoryKeyValueStore> {
        self.store.get().expect("store should be initialised")
    }

    fn citizen(&self) -> User {
        self.citizen.get().expect("citizen should be signed up")
    }

    fn admin(&self) -> User {
        self.admin.get().expect("admin should be signed up")
    }

    fn newest_issue(&self) -> Issue {
        self.store()
            .issue_feed(StatusFilter::All)
            .into_iter()
            .next()
            .expect("at least one issue")
    }

    fn report(&self, title: &str, description: &str) {
        let submission = IssueSubmission::new(unquote(title), unquote(description), "Ward 7");
        self.store()
            .report_issue(&self.citizen(), submission)
            .expect("report issue");
    }

    fn sign_up(&self, name: &str, role: UserRole) -> User {
        self.store()
            .sign_up(UserDraft::new(name, "123456789012", role))
            .expect("sign up")
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim_matches('"')
}

#[fixture]
fn world() -> CivicStoreWorld {
    CivicStoreWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty civic store")]
fn an_empty_civic_store(world: &CivicStoreWorld) {
    let backend = Arc::new(InMemoryKeyValueStore::default());
    let store = CivicStore::new(Arc::clone(&backend), Arc::new(DefaultClock));
    world.backend.set(BackendHandle(backend));
    world.store.set(store);
}

#[given("a signed-up citizen named {name}")]
fn a_signed_up_citizen(world: &CivicStoreWorld, name: String) {
    let user = world.sign_up(&name, UserRole::Citizen);
    world.citizen.set(user);
}

#[given("a signed-up admin named {name}")]
fn a_signed_up_admin(world: &CivicStoreWorld, name: String) {
    let user = world.sign_up(&name, UserRole::Admin);
    world.admin.set(user);
}

#[given("the citizen has reported {title} described as {description}")]
fn the_citizen_has_reported(world: &CivicStoreWorld, title: String, description: String) {
    world.report(&title, &description);
}

#[given("the stored issues entry is corrupt")]
fn the_stored_issues_entry_is_corrupt(world: &CivicStoreWorld) {
    let backend = world.backend.get().expect("backend should be initialised");
    let key = world.store().keys().issues().to_owned();
    backend.0.set(&key, "{ not json").expect("seed corrupt entry");
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the citizen reports {title} described as {description}")]
fn the_citizen_reports(world: &CivicStoreWorld, title: String, description: String) {
    world.report(&title, &description);
}

#[when("the citizen toggles a like on the newest issue")]
fn the_citizen_toggles_a_like(world: &CivicStoreWorld) {
    let issue = world.newest_issue();
    world
        .store()
        .toggle_like(issue.id(), world.citizen().id())
        .expect("toggle like");
}

#[when("the admin marks the newest issue as resolved")]
fn the_admin_marks_resolved(world: &CivicStoreWorld) {
    let issue = world.newest_issue();
    let store = world.store();
    let admin = world.admin();
    let console = store.admin_console(Some(&admin)).expect("admin console");
    console
        .change_status(issue.id(), IssueStatus::Resolved)
        .expect("change status");
}

#[when("the admin bans the citizen")]
fn the_admin_bans_the_citizen(world: &CivicStoreWorld) {
    let store = world.store();
    let admin = world.admin();
    let console = store.admin_console(Some(&admin)).expect("admin console");
    console.ban_user(world.citizen().id()).expect("ban user");
}

#[when("the citizen opens the admin console")]
fn the_citizen_opens_the_admin_console(world: &CivicStoreWorld) {
    let store = world.store();
    let citizen = world.citizen();
    let result = store.admin_console(Some(&citizen)).map(|_| ());
    world.console_result.set(result);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the newest issue is categorised as {category}")]
fn the_newest_issue_is_categorised_as(world: &CivicStoreWorld, category: String) {
    let expected = Category::ALL
        .into_iter()
        .find(|candidate| candidate.label() == category)
        .expect("known category label");
    assert_eq!(world.newest_issue().category(), expected);
}

#[then("the newest issue has status {status}")]
fn the_newest_issue_has_status(world: &CivicStoreWorld, status: String) {
    let expected: IssueStatus = status.parse().expect("known status");
    assert_eq!(world.newest_issue().status(), expected);
}

#[then("the newest issue has {count} likes")]
fn the_newest_issue_has_likes(world: &CivicStoreWorld, count: usize) {
    let issue = world.newest_issue();
    assert_eq!(issue.likes(), count);
    assert_eq!(issue.liked_by().len(), count);
}

#[then("the community has {count} open issues")]
fn the_community_has_open_issues(world: &CivicStoreWorld, count: usize) {
    assert_eq!(world.store().community_stats().open_issues, count);
}

#[then("the community has {count} total issues")]
fn the_community_has_total_issues(world: &CivicStoreWorld, count: usize) {
    assert_eq!(world.store().community_stats().total_issues, count);
}

#[then("the community has {count} active members")]
fn the_community_has_active_members(world: &CivicStoreWorld, count: usize) {
    assert_eq!(world.store().community_stats().active_members, count);
}

#[then("access is forbidden")]
fn access_is_forbidden(world: &CivicStoreWorld) {
    let result = world
        .console_result
        .get()
        .expect("console result should be set");
    assert!(
        matches!(result, Err(StoreError::Forbidden { .. })),
        "expected forbidden, got {result:?}"
    );
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "A reported pothole is tagged as roadways"
)]
fn a_reported_pothole_is_tagged_as_roadways(world: CivicStoreWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "Water and sewer keywords resolve to environmental"
)]
fn water_and_sewer_keywords_resolve_to_environmental(world: CivicStoreWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "Liking twice restores the like count"
)]
fn liking_twice_restores_the_like_count(world: CivicStoreWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "An admin resolves an issue"
)]
fn an_admin_resolves_an_issue(world: CivicStoreWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "Citizens cannot open the admin console"
)]
fn citizens_cannot_open_the_admin_console(world: CivicStoreWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "Banned members leave the active count"
)]
fn banned_members_leave_the_active_count(world: CivicStoreWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/civic_store.feature",
    name = "A corrupt issues entry reads as empty"
)]
fn a_corrupt_issues_entry_reads_as_empty(world: CivicStoreWorld) {
    let _ = world;
}
