use railbook::auth::{create_jwt, decode_jwt, hash_password, verify_password};
use serial_test::serial;

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password("correct horse battery staple").unwrap();
    assert!(verify_password("correct horse battery staple", &hash).unwrap());
    assert!(!verify_password("wrong password", &hash).unwrap());
}

// JWT helpers read JWT_SECRET from the environment, so these tests must
// not interleave.

#[test]
#[serial]
fn test_jwt_round_trip() {
    std::env::set_var("JWT_SECRET", "test-secret");

    let token = create_jwt("alice", 7, "admin").unwrap();
    let claims = decode_jwt(&token).unwrap();

    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.uid, 7);
    assert_eq!(claims.role, "admin");
}

#[test]
#[serial]
fn test_jwt_rejects_foreign_secret() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let token = create_jwt("alice", 7, "user").unwrap();

    std::env::set_var("JWT_SECRET", "a-different-secret");
    assert!(decode_jwt(&token).is_err());

    std::env::set_var("JWT_SECRET", "test-secret");
    assert!(decode_jwt(&token).is_ok());
}

#[test]
#[serial]
fn test_garbage_token_rejected() {
    std::env::set_var("JWT_SECRET", "test-secret");
    assert!(decode_jwt("not-a-token").is_err());
}
