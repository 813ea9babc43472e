#![allow(clippy::unwrap_used)]
// Shared-client acquisition and an end-to-end registration against wiremock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use armctl_core::{
    ArmConfig, ClientRegistry, CoreError, Credentials, NetworkController, PollPolicy,
    ResourcesController, Sleeper, StatusCode,
};
use secrecy::SecretString;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUB: &str = "00000000-0000-0000-0000-0000000000aa";

fn config(endpoint: &str, with_credentials: bool) -> ArmConfig {
    let config = ArmConfig::new(Url::parse(endpoint).unwrap());
    if with_credentials {
        config.with_credentials(Credentials::BearerToken {
            token: SecretString::from("shared-token".to_owned()),
            subscription_id: SUB.into(),
        })
    } else {
        config
    }
}

#[derive(Default)]
struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

#[test]
fn test_controller_without_credential_is_unconfigured() {
    let registry = ClientRegistry::new();
    let controller =
        NetworkController::from_registry(&registry, &config("https://management.azure.com/", false));

    assert!(!controller.is_configured());
    assert!(registry.get().is_none());
}

#[test]
fn test_first_credentialed_construction_wins() {
    let registry = ClientRegistry::new();

    let first = NetworkController::from_registry(
        &registry,
        &config("https://management.local.azurestack.external/", true),
    );
    assert!(first.is_configured());
    let shared = registry.get().unwrap();
    assert_eq!(shared.subscription_id(), SUB);

    // No credential this time, but the shared client already exists.
    let second = NetworkController::from_registry(&registry, &config("https://elsewhere.example/", false));
    assert!(second.is_configured());
    assert!(Arc::ptr_eq(&shared, &registry.get().unwrap()));
    assert_eq!(
        registry.get().unwrap().base_url().as_str(),
        "https://management.local.azurestack.external/"
    );
}

#[tokio::test]
async fn test_registration_end_to_end() {
    let server = MockServer::start().await;
    let register_path = format!("/subscriptions/{SUB}/providers/Microsoft.Storage/register");

    Mock::given(method("POST"))
        .and(path(register_path.as_str()))
        .and(header("authorization", "Bearer shared-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namespace": "Microsoft.Storage",
            "registrationState": "Registering"
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(register_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namespace": "Microsoft.Storage",
            "registrationState": "Registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ClientRegistry::new();
    let controller = ResourcesController::from_registry(&registry, &config(&server.uri(), true));
    let sleeper = RecordingSleeper::default();

    let resp = controller
        .register_resource_provider_with(
            "Microsoft.Storage",
            PollPolicy::from_secs(25, 10).unwrap(),
            &sleeper,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.unwrap().is_registered());
    assert_eq!(sleeper.slept.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_register_call_rejected_by_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {
                "code": "MissingSubscriptionRegistration",
                "message": "The subscription is not registered to use namespace 'Microsoft.Storage'."
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ClientRegistry::new();
    let controller = ResourcesController::from_registry(&registry, &config(&server.uri(), true));

    let err = controller
        .register_resource_provider_with(
            "Microsoft.Storage",
            PollPolicy::default(),
            &RecordingSleeper::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        CoreError::RegistrationFailed {
            status, message, ..
        } => {
            assert_eq!(status, 409);
            assert!(message.contains("not registered to use namespace"));
        }
        other => panic!("expected RegistrationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_token_on_register_stays_remote() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ClientRegistry::new();
    let controller = ResourcesController::from_registry(&registry, &config(&server.uri(), true));
    let sleeper = RecordingSleeper::default();

    let err = controller
        .register_resource_provider_with(
            "Microsoft.Storage",
            PollPolicy::default(),
            &sleeper,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::Remote { status: Some(401), .. }),
        "expected Remote 401, got {err:?}"
    );
    assert!(sleeper.slept.lock().unwrap().is_empty());
}
