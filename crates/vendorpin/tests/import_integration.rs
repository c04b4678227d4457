//! End-to-end resolution against mock registries.

mod common;

use common::config_for;
use vendorpin::config::{LatestVersionConfig, SourceConfig};
use vendorpin::{ArchiveImport, Error, Revision};

const SERDE_INDEX: &str = concat!(
    r#"{"name":"serde","vers":"1.0.190","deps":[],"features":{},"yanked":false}"#,
    "\n",
    r#"{"name":"serde","vers":"1.0.193","deps":[],"features":{},"yanked":true}"#,
    "\n",
    r#"{"name":"serde","vers":"1.0.192","deps":[],"features":{},"yanked":false}"#,
    "\n",
    r#"{"name":"serde","vers":"2.0.0-alpha.1","deps":[],"features":{},"yanked":false}"#,
    "\n",
);

const CRATE_TEMPLATE: &str = "https://static.crates.io/crates/serde/serde-${VERSION}.crate";

#[tokio::test]
async fn crates_io_selects_highest_matching_version() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/se/rd/serde")
        .with_status(200)
        .with_body(SERDE_INDEX)
        .expect(1)
        .create_async()
        .await;

    let config = config_for(
        &server,
        SourceConfig::CratesIo {
            crate_name: "serde".into(),
        },
        CRATE_TEMPLATE,
        Some("^1.0"),
    );
    let import = ArchiveImport::from_config(&config).unwrap();

    let revision = import.resolve(None).await.unwrap();
    assert_eq!(
        revision,
        Revision::new(
            "1.0.193",
            "https://static.crates.io/crates/serde/serde-1.0.193.crate"
        )
    );
}

#[tokio::test]
async fn crates_io_ignore_yanked() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/se/rd/serde")
        .with_status(200)
        .with_body(SERDE_INDEX)
        .create_async()
        .await;

    let mut config = config_for(
        &server,
        SourceConfig::CratesIo {
            crate_name: "serde".into(),
        },
        CRATE_TEMPLATE,
        Some("^1.0"),
    );
    config.ignore_yanked = true;

    let revision = ArchiveImport::from_config(&config)
        .unwrap()
        .resolve(None)
        .await
        .unwrap();
    assert_eq!(revision.version, "1.0.192");
}

#[tokio::test]
async fn crates_io_forced_ref_must_exist() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/se/rd/serde")
        .with_status(200)
        .with_body(SERDE_INDEX)
        .create_async()
        .await;

    let mut config = config_for(
        &server,
        SourceConfig::CratesIo {
            crate_name: "serde".into(),
        },
        CRATE_TEMPLATE,
        Some("^1.0"),
    );
    config.force = true;
    let import = ArchiveImport::from_config(&config).unwrap();

    let revision = import.resolve(Some("1.0.190")).await.unwrap();
    assert_eq!(revision.version, "1.0.190");

    let err = import.resolve(Some("1.0.999")).await.unwrap_err();
    assert!(matches!(err, Error::CannotResolveRevision { .. }));
}

#[tokio::test]
async fn go_proxy_epoch_requirement() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/golang.org/x/mod/@v/list")
        .with_status(200)
        .with_body("v0.13.0\nv0.14.0\nv1.0.0\n")
        .create_async()
        .await;

    let mut config = config_for(
        &server,
        SourceConfig::GoProxy {
            module: "golang.org/x/mod".into(),
        },
        "https://proxy.golang.org/golang.org/x/mod/@v/${VERSION}.zip",
        Some("0"),
    );
    config.epoch = true;

    let revision = ArchiveImport::from_config(&config)
        .unwrap()
        .resolve(None)
        .await
        .unwrap();
    assert_eq!(revision.version, "v0.14.0");
    assert_eq!(
        revision.url,
        "https://proxy.golang.org/golang.org/x/mod/@v/v0.14.0.zip"
    );
}

#[tokio::test]
async fn go_proxy_cli_ref_resolves_through_info() {
    let mut server = mockito::Server::new_async().await;
    let _info = server
        .mock("GET", "/golang.org/x/mod/@v/master.info")
        .with_status(200)
        .with_body(r#"{"Version":"v0.15.1-0.20240101000000-0123456789ab"}"#)
        .create_async()
        .await;

    let mut config = config_for(
        &server,
        SourceConfig::GoProxy {
            module: "golang.org/x/mod".into(),
        },
        "https://proxy.golang.org/golang.org/x/mod/@v/${VERSION}.zip",
        Some(">= 0.1"),
    );
    config.use_cli_ref = true;

    let revision = ArchiveImport::from_config(&config)
        .unwrap()
        .resolve(Some("master"))
        .await
        .unwrap();
    assert_eq!(revision.version, "v0.15.1-0.20240101000000-0123456789ab");
}

#[tokio::test]
async fn npm_no_matching_version() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/left-pad")
        .with_status(200)
        .with_body(r#"{"dist-tags":{"latest":"1.3.0"},"versions":{"1.2.0":{},"1.3.0":{}}}"#)
        .create_async()
        .await;

    let config = config_for(
        &server,
        SourceConfig::Npm {
            package: "left-pad".into(),
        },
        "https://registry.npmjs.org/left-pad/-/left-pad-${VERSION}.tgz",
        Some("^2"),
    );

    let err = ArchiveImport::from_config(&config)
        .unwrap()
        .resolve(None)
        .await
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"no version of left-pad matches requirement '^2' (2 candidates considered)"
    );
}

#[tokio::test]
async fn registry_failure_names_url() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/3/l/log")
        .with_status(503)
        .create_async()
        .await;

    let config = config_for(
        &server,
        SourceConfig::CratesIo {
            crate_name: "log".into(),
        },
        "https://static.crates.io/crates/log/log-${VERSION}.crate",
        Some("0.4"),
    );

    let err = ArchiveImport::from_config(&config)
        .unwrap()
        .resolve(None)
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.url(), Some(format!("{}/3/l/log", server.url()).as_str()));
}

#[tokio::test]
async fn npm_latest_version_skipping_deprecated() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/left-pad")
        .with_status(200)
        .with_body(
            r#"{"versions":{"1.2.0":{},"1.3.0":{"deprecated":"broken"},"1.10.0-rc.1":{}}}"#,
        )
        .create_async()
        .await;

    let mut config = config_for(
        &server,
        SourceConfig::Npm {
            package: "left-pad".into(),
        },
        "https://registry.npmjs.org/left-pad/-/left-pad-${VERSION}.tgz",
        None,
    );
    config.latest_version = Some(LatestVersionConfig {
        format: "${n0}.${n1}.${n2}".into(),
        ..LatestVersionConfig::default()
    });
    config.ignore_deprecated = true;

    let revision = ArchiveImport::from_config(&config)
        .unwrap()
        .resolve(None)
        .await
        .unwrap();
    assert_eq!(
        revision,
        Revision::new(
            "1.2.0",
            "https://registry.npmjs.org/left-pad/-/left-pad-1.2.0.tgz"
        )
    );
}
