//! Public kiosk routes: keypad, lookup by phone and self-enrollment.

use axum::{Router, extract::State, http::StatusCode, routing::post};
use rewards_core::directory::{CustomerDraft, KeypadKey, KeypadOutcome, PhoneKeypad, PhoneNumber};
use rewards_core::ledger::RewardProgress;
use rewards_db::entities::customers;
use rewards_db::{CustomerRepository, LedgerRepository};
use rewards_shared::types::CustomerId;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::Json;

const WELCOME: &str = "Welcome! You have been enrolled in the rewards program.";

/// Creates the kiosk router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kiosk/keypad", post(keypad))
        .route("/kiosk/lookup", post(lookup))
        .route("/kiosk/enroll", post(enroll))
}

#[derive(Debug, Deserialize)]
struct KeypadRequest {
    #[serde(default)]
    buffer: String,
    key: String,
}

#[derive(Debug, Serialize)]
struct KeypadResponse {
    buffer: String,
    display: String,
    /// Digits submitted by this key press, if it was `submit`.
    submitted: Option<String>,
}

/// POST /kiosk/keypad - Apply one key press to the client-held buffer.
async fn keypad(Json(payload): Json<KeypadRequest>) -> ApiResult<Json<KeypadResponse>> {
    let key: KeypadKey = payload.key.parse()?;
    let mut pad = PhoneKeypad::from_buffer(&payload.buffer);

    let submitted = match pad.press(key) {
        KeypadOutcome::Submitted(digits) => Some(digits),
        KeypadOutcome::Edited => None,
    };

    Ok(Json(KeypadResponse {
        buffer: pad.buffer().to_string(),
        display: pad.display().to_string(),
        submitted,
    }))
}

#[derive(Debug, Deserialize)]
struct LookupRequest {
    #[serde(default)]
    phone: String,
}

/// A customer's card on the kiosk screen.
#[derive(Debug, Serialize)]
pub struct CustomerCard {
    /// Customer record.
    pub customer: customers::Model,
    /// Current balance.
    pub balance: i64,
    /// Progress toward the next reward.
    pub progress: RewardProgress,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum LookupResponse {
    Found(CustomerCard),
    NotEnrolled { phone: String },
}

/// POST /kiosk/lookup - Show a customer's balance, or ask them to enroll.
async fn lookup(
    State(state): State<AppState>,
    Json(payload): Json<LookupRequest>,
) -> ApiResult<Json<LookupResponse>> {
    let phone = PhoneNumber::parse(&payload.phone)?;

    let Some(customer) = CustomerRepository::new((*state.db).clone())
        .find_by_phone(&phone)
        .await?
    else {
        return Ok(Json(LookupResponse::NotEnrolled {
            phone: phone.into_inner(),
        }));
    };

    let balance = LedgerRepository::new((*state.db).clone())
        .balance(CustomerId::from_uuid(customer.id))
        .await?;

    Ok(Json(LookupResponse::Found(CustomerCard {
        customer,
        balance,
        progress: RewardProgress::from_balance(balance),
    })))
}

#[derive(Debug, Deserialize)]
struct EnrollRequest {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    name: String,
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct EnrollResponse {
    message: &'static str,
    #[serde(flatten)]
    card: CustomerCard,
}

/// POST /kiosk/enroll - Self-enrollment.
async fn enroll(
    State(state): State<AppState>,
    Json(payload): Json<EnrollRequest>,
) -> ApiResult<(StatusCode, Json<EnrollResponse>)> {
    let draft = CustomerDraft::validate(&payload.phone, &payload.name, payload.email.as_deref())?;
    let customer = CustomerRepository::new((*state.db).clone())
        .create(&draft)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            message: WELCOME,
            card: CustomerCard {
                customer,
                balance: 0,
                progress: RewardProgress::from_balance(0),
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use futures::future::join_all;
    use rstest::rstest;
    use serde_json::json;

    use crate::test_support::{send, test_state};

    #[tokio::test]
    async fn test_keypad_edits_and_submits() {
        let state = test_state().await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/keypad",
            None,
            Some(json!({ "buffer": "555", "key": "1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["buffer"], "5551");
        assert_eq!(body["display"], "5551");
        assert!(body["submitted"].is_null());

        let (_, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/keypad",
            None,
            Some(json!({ "buffer": "5551234567", "key": "submit" })),
        )
        .await;
        assert_eq!(body["submitted"], "5551234567");
        assert_eq!(body["buffer"], "5551234567");

        let (_, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/keypad",
            None,
            Some(json!({ "buffer": "5551234567", "key": "clear" })),
        )
        .await;
        assert_eq!(body["buffer"], "");
        assert_eq!(body["display"], "•••••••••");
    }

    #[rstest]
    #[case("#")]
    #[case("12")]
    #[case("enter")]
    #[tokio::test]
    async fn test_keypad_rejects_unknown_key(#[case] key: &str) {
        let state = test_state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/keypad",
            None,
            Some(json!({ "buffer": "", "key": key })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_keypad_caps_at_fifteen_digits() {
        let state = test_state().await;
        let (_, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/keypad",
            None,
            Some(json!({ "buffer": "123456789012345", "key": "6" })),
        )
        .await;

        assert_eq!(body["buffer"], "123456789012345");
    }

    #[tokio::test]
    async fn test_enroll_then_lookup() {
        let state = test_state().await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/enroll",
            None,
            Some(json!({ "phone": "(555) 123-4567", "name": "  Jane Doe ", "email": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["message"],
            "Welcome! You have been enrolled in the rewards program."
        );
        assert_eq!(body["customer"]["phone"], "5551234567");
        assert_eq!(body["customer"]["name"], "Jane Doe");
        assert!(body["customer"]["email"].is_null());
        assert_eq!(body["balance"], 0);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/lookup",
            None,
            Some(json!({ "phone": "555.123.4567" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "found");
        assert_eq!(body["customer"]["name"], "Jane Doe");
        assert_eq!(body["progress"]["points_to_next_reward"], 200);
    }

    #[tokio::test]
    async fn test_lookup_unknown_phone_offers_enrollment() {
        let state = test_state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/lookup",
            None,
            Some(json!({ "phone": "555-000-1111" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "not_enrolled");
        assert_eq!(body["phone"], "5550001111");
    }

    #[tokio::test]
    async fn test_lookup_rejects_short_phone() {
        let state = test_state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/lookup",
            None,
            Some(json!({ "phone": "12345" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please enter a valid phone number.");
    }

    #[tokio::test]
    async fn test_enroll_duplicate_phone_conflicts() {
        let state = test_state().await;
        let payload = json!({ "phone": "5551234567", "name": "Jane" });

        let (status, _) = send(&state, Method::POST, "/api/v1/kiosk/enroll", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&state, Method::POST, "/api/v1/kiosk/enroll", None, Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"]["message"],
            "This phone number is already registered. Please try again."
        );
    }

    #[tokio::test]
    async fn test_enroll_collects_every_problem() {
        let state = test_state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/kiosk/enroll",
            None,
            Some(json!({ "phone": "abc", "name": " ", "email": "not-an-email" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("Invalid phone number. Please use digits only."));
        assert!(message.contains("Name is required."));
        assert!(message.contains("Please provide a valid email address."));
    }

    #[tokio::test]
    async fn test_concurrent_enrollment_one_winner() {
        let state = test_state().await;
        let attempts = (0..2).map(|i| {
            let state = state.clone();
            async move {
                send(
                    &state,
                    Method::POST,
                    "/api/v1/kiosk/enroll",
                    None,
                    Some(json!({ "phone": "5559998888", "name": format!("Racer {i}") })),
                )
                .await
                .0
            }
        });

        let mut statuses = join_all(attempts).await;
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    }
}
