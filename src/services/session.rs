// ============================================================================
// SESSION SERVICE - Token lifecycle
// ============================================================================
// Owns the decision of whether the client holds a valid session credential,
// and keeps that decision consistent with server-reported 401s.
// ============================================================================

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::models::auth::{TokenPair, UserProfile};

/// Storage slot for the access token.
pub const ACCESS_TOKEN_KEY: &str = "authToken";
/// Storage slot for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage slot for the cached user profile.
pub const USER_DATA_KEY: &str = "userData";
/// Storage slot for the cached worker profile.
pub const WORKER_DATA_KEY: &str = "workerData";

/// The four session artifacts managed as a group: cleared atomically on
/// logout or invalidation, written together on issue.
pub const SESSION_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_DATA_KEY,
    WORKER_DATA_KEY,
];

/// Injected storage capability for the session artifacts.
///
/// Keeps ambient localStorage access out of the lifecycle logic, so the
/// lifecycle itself can be exercised with an in-memory store.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    /// Remove all managed slots. Removing an absent slot is a no-op, so
    /// repeated clears are idempotent.
    fn clear_session(&self) {
        for key in SESSION_KEYS {
            self.remove(key);
        }
    }
}

/// Derived authentication state. Never stored; recomputed from the token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionPhase {
    Unauthenticated,
    Checking,
    Authenticated,
}

/// Claims of interest in the JWT payload segment. Everything else the issuer
/// embeds (jti, iat, user_id, ...) is ignored.
#[derive(Deserialize, Debug)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a compact three-segment token.
///
/// Returns None for any malformed input: wrong segment count, non-base64url
/// middle segment, or a payload that is not a JSON object. Never panics.
pub fn decode_claims(raw: &str) -> Option<Claims> {
    let segments: Vec<&str> = raw.split('.').collect();
    if segments.len() != 3 {
        return None;
    }
    let payload = URL_SAFE_NO_PAD.decode(segments[1]).ok()?;
    serde_json::from_slice(&payload).ok()
}

/// A token is live iff it parses and its expiry is strictly in the future.
/// A token expiring exactly "now" is already expired.
pub fn token_is_live(raw: &str, now: i64) -> bool {
    match decode_claims(raw) {
        Some(Claims { exp: Some(exp) }) => exp > now,
        _ => false,
    }
}

/// Token lifecycle manager over an injected [`SessionStore`].
pub struct SessionService<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Evaluate a raw token against `now` (Unix seconds).
    ///
    /// Absent token: unauthenticated, nothing to clean up. Malformed or
    /// expired token: all stored session artifacts are cleared before
    /// reporting unauthenticated.
    pub fn evaluate_token(&self, raw: Option<&str>, now: i64) -> SessionPhase {
        match raw {
            None => SessionPhase::Unauthenticated,
            Some(raw) if token_is_live(raw, now) => SessionPhase::Authenticated,
            Some(_) => {
                log::info!("🔒 [SESSION] Stored token invalid or expired, clearing session");
                self.store.clear_session();
                SessionPhase::Unauthenticated
            }
        }
    }

    /// Evaluate the token currently held in the store.
    pub fn evaluate(&self, now: i64) -> SessionPhase {
        let raw = self.access_token();
        self.evaluate_token(raw.as_deref(), now)
    }

    /// Persist credentials and profile blobs after a successful login.
    pub fn issue(
        &self,
        tokens: &TokenPair,
        user: Option<&UserProfile>,
        worker: Option<&serde_json::Value>,
    ) {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token);
        if let Some(refresh) = &tokens.refresh_token {
            self.store.set(REFRESH_TOKEN_KEY, refresh);
        }
        if let Some(user) = user {
            if let Ok(json) = serde_json::to_string(user) {
                self.store.set(USER_DATA_KEY, &json);
            }
        }
        if let Some(worker) = worker {
            if let Ok(json) = serde_json::to_string(worker) {
                self.store.set(WORKER_DATA_KEY, &json);
            }
        }
        log::info!("✅ [SESSION] Credentials issued");
    }

    /// Explicit user logout. Same clearing side effect as invalidation.
    pub fn logout(&self) {
        self.store.clear_session();
        log::info!("👋 [SESSION] Logged out, session cleared");
    }

    /// Server reported an authorization failure on an outbound request.
    /// Idempotent: concurrent in-flight failures all land on the same
    /// cleared terminal state.
    pub fn on_unauthorized(&self) {
        self.store.clear_session();
        log::info!("🔒 [SESSION] 401 received, session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        slots: RefCell<HashMap<String, String>>,
    }

    impl SessionStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.slots.borrow().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        }
        fn remove(&self, key: &str) {
            self.slots.borrow_mut().remove(key);
        }
    }

    fn service_with_token(raw: &str) -> SessionService<MemoryStore> {
        let service = SessionService::new(MemoryStore::default());
        service.store().set(ACCESS_TOKEN_KEY, raw);
        service.store().set(REFRESH_TOKEN_KEY, "refresh");
        service.store().set(USER_DATA_KEY, "{}");
        service.store().set(WORKER_DATA_KEY, "{}");
        service
    }

    fn token_with_payload(payload: &str) -> String {
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("header.{}.signature", body)
    }

    fn token_with_exp(exp: i64) -> String {
        token_with_payload(&format!("{{\"exp\":{}}}", exp))
    }

    const NOW: i64 = 1_758_136_697;

    #[test]
    fn live_token_authenticates() {
        let service = service_with_token(&token_with_exp(NOW + 3600));
        assert_eq!(service.evaluate(NOW), SessionPhase::Authenticated);
        assert!(service.access_token().is_some());
    }

    #[test]
    fn expired_token_clears_all_artifacts() {
        let service = service_with_token(&token_with_exp(NOW - 1));
        assert_eq!(service.evaluate(NOW), SessionPhase::Unauthenticated);
        for key in SESSION_KEYS {
            assert!(service.store().get(key).is_none(), "{} should be cleared", key);
        }
    }

    #[test]
    fn token_expiring_exactly_now_is_expired() {
        let service = service_with_token(&token_with_exp(NOW));
        assert_eq!(service.evaluate(NOW), SessionPhase::Unauthenticated);
    }

    #[test]
    fn absent_token_is_unauthenticated() {
        let service = SessionService::new(MemoryStore::default());
        assert_eq!(service.evaluate(NOW), SessionPhase::Unauthenticated);
        assert_eq!(service.evaluate_token(None, NOW), SessionPhase::Unauthenticated);
    }

    #[test]
    fn malformed_tokens_never_panic() {
        let service = SessionService::new(MemoryStore::default());
        let cases = [
            "",
            "onlyonesegment",
            "two.segments",
            "too.many.dots.here",
            "head.!!!not-base64url!!!.sig",
            &token_with_payload("not json"),
            &token_with_payload("[1,2,3]"),
        ];
        for raw in cases {
            assert_eq!(
                service.evaluate_token(Some(raw), NOW),
                SessionPhase::Unauthenticated,
                "token {:?} must degrade to unauthenticated",
                raw
            );
        }
    }

    #[test]
    fn missing_exp_claim_is_treated_as_expired() {
        let service = service_with_token(&token_with_payload("{\"iat\":123}"));
        assert_eq!(service.evaluate(NOW), SessionPhase::Unauthenticated);
        assert!(service.store().get(ACCESS_TOKEN_KEY).is_none());
    }

    #[test]
    fn logout_and_on_unauthorized_are_idempotent() {
        let service = service_with_token(&token_with_exp(NOW + 3600));
        service.on_unauthorized();
        service.on_unauthorized();
        service.logout();
        for key in SESSION_KEYS {
            assert!(service.store().get(key).is_none());
        }
        assert_eq!(service.evaluate(NOW), SessionPhase::Unauthenticated);
    }

    #[test]
    fn issue_persists_all_four_slots() {
        let service = SessionService::new(MemoryStore::default());
        let tokens = TokenPair {
            access_token: token_with_exp(NOW + 3600),
            refresh_token: Some("refresh".to_string()),
        };
        let user = UserProfile {
            id: "u1".to_string(),
            first_name: "Emmanuel".to_string(),
            last_name: "Owusu".to_string(),
            email: None,
            phone_number: Some("0245767665".to_string()),
            photo: None,
        };
        let worker = serde_json::json!({ "id": "w1" });
        service.issue(&tokens, Some(&user), Some(&worker));

        for key in SESSION_KEYS {
            assert!(service.store().get(key).is_some(), "{} should be set", key);
        }
        assert_eq!(service.evaluate(NOW), SessionPhase::Authenticated);
    }

    #[test]
    fn issue_without_refresh_token_leaves_slot_empty() {
        let service = SessionService::new(MemoryStore::default());
        let tokens = TokenPair {
            access_token: token_with_exp(NOW + 3600),
            refresh_token: None,
        };
        service.issue(&tokens, None, None);
        assert!(service.store().get(REFRESH_TOKEN_KEY).is_none());
        assert_eq!(service.evaluate(NOW), SessionPhase::Authenticated);
    }

    #[test]
    fn real_world_jwt_payload_decodes() {
        // Same shape the backend issues: token_type/exp/iat/jti/user_id.
        let raw = token_with_payload(
            "{\"token_type\":\"access\",\"exp\":1789672697,\"iat\":1758136697,\
             \"jti\":\"ede5366b0d194bbbb87071eb0e65d887\",\"user_id\":\"ad488076\"}",
        );
        let claims = decode_claims(&raw).expect("payload should decode");
        assert_eq!(claims.exp, Some(1_789_672_697));
        assert!(token_is_live(&raw, NOW));
        assert!(!token_is_live(&raw, 1_789_672_697));
    }
}
