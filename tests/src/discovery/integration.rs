use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vscout_common::input::{self, TargetSource};
use vscout_core::sink::SqliteSink;

use super::util::{config, dead_target, runner, stored_rows, write_list};

/// Serves a default page, plus distinct pages for `admin.corp.test` and `old.corp.test`.
async fn vhost_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("host", "admin.corp.test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("admin console"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("host", "old.corp.test"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", "https://new.corp.test/")
                .set_body_string("moved"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("default site"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn discovered_vhosts_are_stored() {
    let server = vhost_server().await;
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.sqlite");
    let vhosts_path = write_list(
        dir.path(),
        "vhosts.txt",
        &["admin.corp.test", "", "  old.corp.test  ", "www.corp.test"],
    );

    let targets = TargetSource::detect(&server.uri()).await.load().await.unwrap();
    let vhosts = input::load_vhosts(&vhosts_path).await.unwrap();
    assert_eq!(vhosts.len(), 3);

    let cfg = config(db.clone());
    let summary = runner(&cfg)
        .run(targets.clone(), vhosts, SqliteSink::new(&cfg.database))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, targets);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.persisted, 2);

    let rows = stored_rows(&db);
    assert_eq!(
        rows,
        vec![
            (targets[0].clone(), "admin.corp.test".to_string(), 200),
            (targets[0].clone(), "old.corp.test".to_string(), 301),
        ]
    );
}

#[tokio::test]
async fn unreachable_target_is_isolated() {
    let server = vhost_server().await;
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.sqlite");
    let dead = dead_target();
    let targets_path = write_list(dir.path(), "targets.txt", &[&dead, &server.uri()]);
    let vhosts_path = write_list(dir.path(), "vhosts.txt", &["admin.corp.test"]);

    let source = TargetSource::detect(targets_path.to_str().unwrap()).await;
    assert_eq!(source, TargetSource::File(targets_path.clone()));
    let targets = source.load().await.unwrap();
    let vhosts = input::load_vhosts(&vhosts_path).await.unwrap();

    let cfg = config(db.clone());
    let summary = runner(&cfg)
        .run(targets, vhosts, SqliteSink::new(&cfg.database))
        .await
        .unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].target, dead);
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(stored_rows(&db).len(), 1);
}

#[tokio::test]
async fn rescanning_appends_rows() {
    let server = vhost_server().await;
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.sqlite");
    let cfg = config(db.clone());

    for _ in 0..2 {
        runner(&cfg)
            .run(
                vec![server.uri()],
                vec!["admin.corp.test".to_string()],
                SqliteSink::new(&cfg.database),
            )
            .await
            .unwrap();
    }

    assert_eq!(stored_rows(&db).len(), 2);
}

#[tokio::test]
async fn no_discoveries_leave_no_database() {
    let server = vhost_server().await;
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.sqlite");
    let cfg = config(db.clone());

    let summary = runner(&cfg)
        .run(
            vec![server.uri()],
            vec!["www.corp.test".to_string(), "mail.corp.test".to_string()],
            SqliteSink::new(&cfg.database),
        )
        .await
        .unwrap();

    assert_eq!(summary.discovered, 0);
    assert_eq!(summary.succeeded.len(), 1);
    assert!(!db.exists());
}

#[tokio::test]
async fn missing_vhost_list_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = input::load_vhosts(&dir.path().join("nope.txt")).await.unwrap_err();
    assert!(err.to_string().contains("vhost"));
}
