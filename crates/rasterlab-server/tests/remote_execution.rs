// End-to-end scenarios over real TCP on an ephemeral port: login and
// roster visibility, silent rejection, upload/execute round trips, and
// workspace isolation between concurrent clients.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::timeout;

use rasterlab_client::{ClientError, WorkbenchClient};
use rasterlab_core::{Catalog, GradientField, PeakDetect, RasterImage, Threshold, VectorField};
use rasterlab_server::config::Config;
use rasterlab_server::credentials::CredentialStore;
use rasterlab_server::roster::Roster;
use rasterlab_server::server::Server;

async fn start_server() -> (SocketAddr, Roster) {
    let mut credentials = CredentialStore::empty();
    credentials.add_account("alice", "password");
    credentials.add_account("bob", "hunter2");

    let config = Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        max_clients: 8,
        accounts_file: None,
    };

    let server = Server::bind(&config, Catalog::builtin(), credentials)
        .await
        .expect("bind on an ephemeral port");
    let addr = server.local_addr().expect("bound address");
    let roster = server.roster();
    tokio::spawn(server.serve());
    (addr, roster)
}

async fn connect(addr: SocketAddr) -> WorkbenchClient {
    WorkbenchClient::connect(&addr.to_string(), &Catalog::builtin())
        .await
        .expect("connect to test server")
}

fn ramp_image(name: &str) -> RasterImage {
    let pixels = (0..12).map(|i| (i % 4) as f32).collect();
    RasterImage::new(name, 4, 3, pixels)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_shows_up_in_the_roster() {
    let (addr, roster) = start_server().await;
    let mut rx = roster.subscribe();

    let mut client = connect(addr).await;
    client.login("alice", "password").await.expect("login");

    timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = roster.snapshot().await;
            if snapshot
                .iter()
                .any(|info| info.user.as_deref() == Some("alice"))
            {
                assert_eq!(snapshot.len(), 1);
                assert!(format!("{}", snapshot[0]).contains("user alice"));
                break;
            }
            rx.changed().await.expect("roster channel alive");
        }
    })
    .await
    .expect("roster should record the authenticated user");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_login_is_silent_then_retry_succeeds() {
    let (addr, _roster) = start_server().await;

    let mut client = connect(addr).await;
    client.set_login_timeout(Duration::from_millis(200));

    match client.login("eve", "wrong").await {
        Err(ClientError::LoginTimeout(_)) => {}
        other => panic!("expected LoginTimeout, got {:?}", other),
    }

    // Same connection, correct credentials.
    client.login("alice", "password").await.expect("retry login");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upload_before_login_gets_no_acknowledgement() {
    let (addr, _roster) = start_server().await;
    let mut client = connect(addr).await;

    let result = timeout(
        Duration::from_millis(300),
        client.send_model(&ramp_image("early")),
    )
    .await;
    assert!(result.is_err(), "server must stay silent before login");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upload_and_remote_execution_round_trip() {
    let (addr, _roster) = start_server().await;

    let mut client = connect(addr).await;
    client.login("alice", "password").await.expect("login");

    let image = ramp_image("scene");
    client.send_model(&image).await.expect("model upload");

    let results = client
        .run_algorithm(&GradientField::new(image, "grad"))
        .await
        .expect("remote run");

    assert_eq!(results, vec!["grad", "grad.magnitude"]);

    // Results were materialized into the client's own workspace.
    let field: VectorField = client.workspace().require_model("grad").expect("field");
    assert_eq!((field.width, field.height), (4, 3));
    // dx of the ramp is 1.0 everywhere except the last column.
    assert_eq!(field.vectors[0], [1.0, 0.0]);

    let magnitude: RasterImage = client
        .workspace()
        .require_model("grad.magnitude")
        .expect("magnitude image");
    assert_eq!(magnitude.pixels[0], 1.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_execution_reports_error_and_connection_survives() {
    let (addr, _roster) = start_server().await;

    let mut client = connect(addr).await;
    client.login("alice", "password").await.expect("login");

    let image = ramp_image("scene");
    client.send_model(&image).await.expect("model upload");

    match client
        .run_algorithm(&PeakDetect::new(image.clone(), "peaks", -1.0))
        .await
    {
        Err(ClientError::Rejected(0)) => {}
        other => panic!("expected Rejected(0), got {:?}", other),
    }

    // The connection stays usable for the next request.
    client.send_model(&image).await.expect("upload after error");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_clients_never_see_each_other_s_models() {
    let (addr, _roster) = start_server().await;

    let mut alice = connect(addr).await;
    alice.login("alice", "password").await.expect("alice login");
    let mut bob = connect(addr).await;
    bob.login("bob", "hunter2").await.expect("bob login");

    // Same model name, different contents, uploaded concurrently.
    let bright = RasterImage::new("shared", 2, 2, vec![1.0; 4]);
    let dark = RasterImage::new("shared", 2, 2, vec![0.0; 4]);
    let (a, b) = tokio::join!(alice.send_model(&bright), bob.send_model(&dark));
    a.expect("alice upload");
    b.expect("bob upload");

    let alice_algo = Threshold::new(bright.clone(), "out", 0.5);
    let bob_algo = Threshold::new(dark.clone(), "out", 0.5);
    let (a, b) = tokio::join!(
        alice.run_algorithm(&alice_algo),
        bob.run_algorithm(&bob_algo)
    );
    a.expect("alice run");
    b.expect("bob run");

    let alice_out: RasterImage = alice.workspace().require_model("out").expect("alice out");
    let bob_out: RasterImage = bob.workspace().require_model("out").expect("bob out");

    // Each result reflects only that client's own upload.
    assert_eq!(alice_out.pixels, vec![1.0; 4]);
    assert_eq!(bob_out.pixels, vec![0.0; 4]);
}
