use anyhow::Result;
use dossier_cli::api::{ApiClient, ApiError, Session};
use dossier_cli::config::Config;
use dossier_cli::models::{DossierStatus, NewDossier, ValidationError};
use dossier_cli::ui::App;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn client_for(server: &Server, session: Session) -> Result<ApiClient> {
    let config = Config::default().with_base_url(server.url());
    ApiClient::new(&config, session)
}

fn logged_in() -> Result<Session> {
    let session = Session::in_memory();
    session.set_tokens("acc", "ref")?;
    Ok(session)
}

fn complete_form(numero: &str) -> NewDossier {
    NewDossier {
        numero: numero.to_string(),
        dostype: "Finance".to_string(),
        dosdef: "DEF".to_string(),
        tef: "TEF".to_string(),
        bon_caisse: "BC".to_string(),
        mandat_paiement: "MP".to_string(),
    }
}

/// Server that accepts the refresh and lists `D1` and `D2`
async fn mounted_server() -> ServerGuard {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token/refresh/")
        .with_status(200)
        .with_body(r#"{"access":"acc2","username":"alice"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/dossiers/")
        .with_status(200)
        .with_body(
            json!([
                {"numero": "D1", "dostype": "RH", "responsable": "alice", "statut": "termine",
                 "dosdef": "x", "tef": "x", "bon_caisse": "x", "mandat_paiement": "x"},
                {"numero": "D2", "dostype": "", "responsable": "alice", "statut": "en_attente"}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
}

#[tokio::test]
async fn test_create_with_empty_numero_makes_no_call() -> Result<()> {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/dossiers/")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let form = NewDossier {
        numero: "   ".to_string(),
        dostype: "RH".to_string(),
        ..Default::default()
    };

    let err = client.create_dossier(&form, "alice").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Validation(ValidationError::MissingNumero))
    ));
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_create_sends_status_and_owner() -> Result<()> {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/dossiers/")
        .match_header("authorization", "Bearer acc")
        .match_body(Matcher::PartialJson(json!({
            "numero": "D5",
            "statut": "termine",
            "responsable": "alice",
            "bon_caisse": "BC"
        })))
        .with_status(201)
        .with_body(
            json!({"numero": "D5", "dostype": "Finance", "responsable": "alice", "statut": "termine"})
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let created = client.create_dossier(&complete_form("D5"), "alice").await?;

    assert_eq!(created.numero, "D5");
    assert_eq!(created.statut, DossierStatus::Done);
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_create_incomplete_form_is_pending() -> Result<()> {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/dossiers/")
        .match_body(Matcher::PartialJson(json!({"numero": "D6", "statut": "en_attente"})))
        .with_status(201)
        .with_body(r#"{"numero":"D6","statut":"en_attente"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let mut form = complete_form("D6");
    form.tef.clear();

    client.create_dossier(&form, "alice").await?;
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_mount_with_failed_refresh_logs_out() -> Result<()> {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/api/token/refresh/")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/api/dossiers/")
        .expect(0)
        .create_async()
        .await;

    let session = logged_in()?;
    let client = client_for(&server, session.clone())?;

    let err = App::mount(&client).await.err().expect("mount should fail");

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::SessionExpired)
    ));
    assert!(session.access_token().is_none());
    assert!(session.refresh_token().is_none());
    refresh.assert_async().await;
    list.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_mount_without_session_makes_no_call() -> Result<()> {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/api/token/refresh/")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, Session::in_memory())?;

    assert!(App::mount(&client).await.is_err());
    refresh.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_mount_loads_username_and_dossiers() -> Result<()> {
    let server = mounted_server().await;
    let session = logged_in()?;
    let client = client_for(&server, session.clone())?;

    let app = App::mount(&client).await?;

    assert_eq!(app.username, "alice");
    assert_eq!(app.dossiers.len(), 2);
    assert_eq!(session.access_token().as_deref(), Some("acc2"));

    let summary = app.summary();
    assert_eq!((summary.total, summary.done, summary.pending), (2, 1, 1));
    Ok(())
}

#[tokio::test]
async fn test_mount_accepts_records_with_null_status() -> Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token/refresh/")
        .with_status(200)
        .with_body(r#"{"access":"acc2","username":"alice"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/dossiers/")
        .with_status(200)
        .with_body(r#"[{"numero":"D1","statut":"termine"},{"numero":"D2","statut":null,"tef":null}]"#)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let app = App::mount(&client).await?;

    assert_eq!(app.dossiers.len(), 2);
    assert_eq!(app.dossiers[1].statut, DossierStatus::Pending);
    let summary = app.summary();
    assert_eq!((summary.done, summary.pending), (1, 1));
    Ok(())
}

#[tokio::test]
async fn test_mount_keeps_going_when_list_fails() -> Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token/refresh/")
        .with_status(200)
        .with_body(r#"{"access":"acc2","username":"alice"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/dossiers/")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let app = App::mount(&client).await?;

    assert_eq!(app.username, "alice");
    assert!(app.dossiers.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_delete_removes_only_matching_dossier() -> Result<()> {
    let mut server = mounted_server().await;
    let delete = server
        .mock("DELETE", "/api/dossiers/D1/")
        .match_header("authorization", "Bearer acc2")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let mut app = App::mount(&client).await?;

    assert!(app.delete_dossier(&client, "D1").await);

    let left: Vec<&str> = app.dossiers.iter().map(|d| d.numero.as_str()).collect();
    assert_eq!(left, vec!["D2"]);
    assert_eq!(app.summary().done, 0);
    delete.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_failed_delete_keeps_list() -> Result<()> {
    let mut server = mounted_server().await;
    let delete = server
        .mock("DELETE", "/api/dossiers/D2/")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let mut app = App::mount(&client).await?;

    assert!(!app.delete_dossier(&client, "D2").await);
    assert_eq!(app.dossiers.len(), 2);
    delete.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_submit_form_appends_and_resets() -> Result<()> {
    let mut server = mounted_server().await;
    let create = server
        .mock("POST", "/api/dossiers/")
        .match_body(Matcher::PartialJson(json!({"numero": "D3", "responsable": "alice"})))
        .with_status(201)
        .with_body(r#"{"numero":"D3","responsable":"alice","statut":"termine"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let mut app = App::mount(&client).await?;
    app.toggle_form();
    app.form = complete_form("D3");

    assert!(app.submit_form(&client).await?);

    assert_eq!(app.dossiers.len(), 3);
    assert_eq!(app.dossiers[2].numero, "D3");
    assert_eq!(app.form, NewDossier::default());
    assert!(!app.show_form);
    assert_eq!(app.summary().done, 2);
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_submit_invalid_form_keeps_it_open() -> Result<()> {
    let mut server = mounted_server().await;
    let create = server
        .mock("POST", "/api/dossiers/")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let mut app = App::mount(&client).await?;
    app.toggle_form();
    app.form.dostype = "RH".to_string();

    assert!(app.submit_form(&client).await.is_err());
    assert!(app.show_form);
    assert_eq!(app.form.dostype, "RH");
    assert_eq!(app.dossiers.len(), 2);
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_failed_create_is_ignored() -> Result<()> {
    let mut server = mounted_server().await;
    server
        .mock("POST", "/api/dossiers/")
        .with_status(400)
        .with_body(r#"{"numero":["dossier with this numero already exists."]}"#)
        .create_async()
        .await;

    let client = client_for(&server, logged_in()?)?;
    let mut app = App::mount(&client).await?;

    assert!(!app.add_dossier(&client, &complete_form("D1")).await?);
    assert_eq!(app.dossiers.len(), 2);
    Ok(())
}
