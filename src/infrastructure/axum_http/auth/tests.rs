use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";
const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn auth_secret(audience: Option<&str>) -> AuthSecret {
    AuthSecret {
        jwt_secret: SECRET.to_string(),
        jwt_audience: audience.map(str::to_string),
    }
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn claims(exp: usize) -> Claims {
    Claims {
        sub: USER_ID.to_string(),
        is_staff: false,
        email: Some("test@example.com".to_string()),
        exp,
    }
}

#[derive(Serialize)]
struct AudienceClaims {
    sub: String,
    aud: String,
    exp: usize,
}

#[test]
fn test_validate_jwt_success() {
    let my_claims = claims(9999999999);
    let token = sign(&my_claims, SECRET);

    let claims = validate_jwt(&token, &auth_secret(None)).expect("Valid token should pass");
    assert_eq!(claims.sub, my_claims.sub);
    assert_eq!(claims.email, my_claims.email);
    assert!(!claims.is_staff);
}

#[test]
fn test_validate_jwt_expired() {
    let token = sign(&claims(1), SECRET);

    let result = validate_jwt(&token, &auth_secret(None));
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let token = sign(&claims(9999999999), "wrongsecret");

    let result = validate_jwt(&token, &auth_secret(None));
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_audience() {
    let token = sign(
        &AudienceClaims {
            sub: USER_ID.to_string(),
            aud: "marketplace".to_string(),
            exp: 9999999999,
        },
        SECRET,
    );

    assert!(validate_jwt(&token, &auth_secret(Some("marketplace"))).is_ok());
    assert!(validate_jwt(&token, &auth_secret(Some("someone-else"))).is_err());
}

#[test]
fn test_staff_claim_reaches_caller() {
    let mut my_claims = claims(9999999999);
    my_claims.is_staff = true;
    let token = sign(&my_claims, SECRET);

    let claims = validate_jwt(&token, &auth_secret(None)).unwrap();
    let auth_user = AuthUser {
        user_id: Uuid::parse_str(&claims.sub).unwrap(),
        email: claims.email,
        is_staff: claims.is_staff,
    };

    let caller = auth_user.caller();
    assert!(caller.is_staff);
    assert_eq!(caller.user_id.to_string(), USER_ID);
}
