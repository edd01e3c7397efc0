use ec_auth::*;

#[test]
fn login_creates_session_for_directory_user() {
    let directory = UserDirectory::with_demo_accounts().unwrap();
    let sessions = SessionStore::default();

    let user = directory
        .authenticate(DEMO_ADMIN_EMAIL, DEMO_PASSWORD)
        .unwrap();
    let session = sessions.create(user.clone());

    let found = sessions.authenticate(Some(session.id.as_str())).unwrap();
    assert_eq!(found.user, user);
    assert!(found.require(Role::Admin).is_ok());
}

#[test]
fn buyer_session_is_forbidden_admin_access() {
    let directory = UserDirectory::with_demo_accounts().unwrap();
    let sessions = SessionStore::default();

    let buyer = directory
        .authenticate(DEMO_BUYER_EMAIL, DEMO_PASSWORD)
        .unwrap();
    let session = sessions.create(buyer);

    let err = session.require(Role::Admin).unwrap_err();
    assert!(err.is_permission_error());
    assert!(!err.is_auth_failure());
}

#[test]
fn failed_login_creates_no_session() {
    let directory = UserDirectory::with_demo_accounts().unwrap();
    let sessions = SessionStore::default();

    let err = directory
        .authenticate(DEMO_BUYER_EMAIL, "letmein")
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(sessions.count(), 0);
}

#[test]
fn sessions_are_independent() {
    let directory = UserDirectory::with_demo_accounts().unwrap();
    let sessions = SessionStore::default();
    let buyer = directory
        .authenticate(DEMO_BUYER_EMAIL, DEMO_PASSWORD)
        .unwrap();

    let first = sessions.create(buyer.clone());
    let second = sessions.create(buyer);
    assert_ne!(first.id, second.id);

    sessions.delete(first.id.as_str());
    assert!(sessions.get(first.id.as_str()).is_none());
    assert!(sessions.get(second.id.as_str()).is_some());
}
