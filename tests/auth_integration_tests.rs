use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use greenlands_portal::{
    AppState,
    auth::{AuthUser, Claims},
    config::Env,
    error::ApiError,
    models::{Message, MessagingStats, Party, Priority, Role, User},
    repository::Repository,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use uuid::Uuid;

// --- Mock Repository for Auth Logic ---

#[derive(Default)]
struct MockAuthRepo {
    user_to_return: Option<User>,
}

#[async_trait]
impl Repository for MockAuthRepo {
    async fn get_user(&self, _id: Uuid) -> Option<User> {
        self.user_to_return.clone()
    }
    // The remaining trait methods are unused by the extractor; placeholders only.
    async fn verify_credentials(&self, _email: &str, _password: &str) -> Option<User> {
        self.user_to_return.clone()
    }
    async fn list_contacts(&self, _exclude: Uuid) -> Vec<User> {
        vec![]
    }
    async fn get_messages_for(&self, _user_id: Uuid) -> Vec<Message> {
        vec![]
    }
    async fn get_message(&self, _id: Uuid) -> Option<Message> {
        None
    }
    async fn insert_message(
        &self,
        sender: Party,
        recipient: Party,
        subject: String,
        content: String,
        priority: Priority,
    ) -> Message {
        Message {
            sender,
            recipient,
            subject,
            content,
            priority,
            ..Message::default()
        }
    }
    async fn mark_read(&self, _id: Uuid, _recipient_id: Uuid) -> Option<Message> {
        None
    }
    async fn delete_message(&self, _id: Uuid) -> bool {
        false
    }
    async fn get_stats(&self) -> MessagingStats {
        MessagingStats::default()
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn create_token_with_secret(user_id: Uuid, exp_offset: i64, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        // Negative offsets produce an already-expired token.
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_token(user_id: Uuid, exp_offset: i64) -> String {
    create_token_with_secret(user_id, exp_offset, TEST_JWT_SECRET)
}

fn create_app_state(env: Env, repo: MockAuthRepo, jwt_secret: String) -> AppState {
    let mut config = greenlands_portal::config::AppConfig::default();
    config.env = env;
    config.jwt_secret = jwt_secret;

    AppState {
        repo: Arc::new(repo),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let token = create_token(TEST_USER_ID, 3600);

    let mock_repo = MockAuthRepo {
        user_to_return: Some(User {
            id: TEST_USER_ID,
            name: "Test Farmer".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Farmer,
        }),
    };

    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.role, Role::Farmer);
    assert_eq!(user.name, "Test Farmer");
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    // One hour in the past, comfortably beyond the validation leeway.
    let token = create_token(TEST_USER_ID, -3600);

    let mock_repo = MockAuthRepo {
        user_to_return: Some(User::default()),
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn test_auth_failure_with_wrong_signature() {
    // Signed with a different secret than the one the server validates with.
    let token = create_token_with_secret(TEST_USER_ID, 3600, "some-other-secret-entirely");

    let mock_repo = MockAuthRepo {
        user_to_return: Some(User::default()),
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn test_auth_failure_when_user_deleted_after_issuance() {
    let token = create_token(TEST_USER_ID, 3600);

    // Valid token, but the directory no longer knows the subject.
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo {
            user_to_return: None,
        },
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn test_local_bypass_success() {
    let mock_user_id = Uuid::new_v4();
    let mock_repo = MockAuthRepo {
        user_to_return: Some(User {
            id: mock_user_id,
            name: "Local Admin".to_string(),
            email: "local@dev.com".to_string(),
            role: Role::Admin,
        }),
    };
    let app_state = create_app_state(Env::Local, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, mock_user_id);
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let mock_user_id = Uuid::new_v4();
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Provide ONLY the local bypass header
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthenticated)));
}
