#![cfg(feature = "server")]

use actix_web::{
    cookie::Cookie,
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};
use async_trait::async_trait;
use pixelprompt::{
    server::{self, AppState, SESSION_COOKIE},
    EditRequest, GenerationRequest, ImageApi, ImageArtifact, Result, StudioError,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Answers generate with a fixed PNG header and fails edits whose prompt is "fail".
#[derive(Default)]
struct ScriptedApi {
    generated: Mutex<Vec<GenerationRequest>>,
    edited: Mutex<Vec<EditRequest>>,
}

#[async_trait]
impl ImageApi for ScriptedApi {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageArtifact> {
        self.generated.lock().unwrap().push(request);
        Ok(ImageArtifact::new("iVBORw=="))
    }

    async fn edit(&self, request: EditRequest) -> Result<ImageArtifact> {
        let fail = request.prompt == "fail";
        self.edited.lock().unwrap().push(request);
        if fail {
            return Err(StudioError::Api {
                status: 400,
                detail: Some("bad prompt".into()),
            });
        }
        Ok(ImageArtifact::new("RURJVA=="))
    }
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("session cookie")
}

fn text(bytes: web::Bytes) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn generate_then_edit_round_trip() {
    let api = Arc::new(ScriptedApi::default());
    let state = web::Data::new(AppState::new(api.clone(), 8));
    let app = test::init_service(App::new().app_data(state).configure(server::routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate")
            .cookie(cookie.clone())
            .set_form([("prompt", "a lighthouse"), ("size", "1024x1536")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    {
        let generated = api.generated.lock().unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].prompt, "a lighthouse");
        assert_eq!(generated[0].size.as_str(), "1024x1536");
    }

    let request = test::TestRequest::get()
        .uri("/")
        .cookie(cookie.clone())
        .to_request();
    let page = text(test::call_and_read_body(&app, request).await);
    assert!(page.contains(r#"<img src="data:image/png;base64,iVBORw==" alt="Generated" />"#));
    assert!(page.contains("Your edited image will appear here."));

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/edit")
            .cookie(cookie.clone())
            .set_form([("edit_prompt", "add clouds")])
            .to_request(),
    )
    .await;
    assert_eq!(api.edited.lock().unwrap()[0].image_base64, "iVBORw==");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/images/generated")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);

    let state: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/state").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(state["generate"]["status"], "success");
    assert_eq!(state["edit"]["status"], "success");
    assert_eq!(state["edit"]["has_image"], true);
}

#[actix_web::test]
async fn edit_before_generate_shows_local_error() {
    let api = Arc::new(ScriptedApi::default());
    let state = web::Data::new(AppState::new(api.clone(), 8));
    let app = test::init_service(App::new().app_data(state).configure(server::routes)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/edit")
            .set_form([("edit_prompt", "add clouds")])
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&resp);
    assert!(api.edited.lock().unwrap().is_empty());

    let request = test::TestRequest::get()
        .uri("/")
        .cookie(cookie.clone())
        .to_request();
    let page = text(test::call_and_read_body(&app, request).await);
    assert!(page.contains(r#"<p class="error">Generate an image before editing.</p>"#));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/images/edited")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn remote_detail_is_rendered_next_to_edit_form() {
    let api = Arc::new(ScriptedApi::default());
    let state = web::Data::new(AppState::new(api, 8));
    let app = test::init_service(App::new().app_data(state).configure(server::routes)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate")
            .set_form([("prompt", "a cat")])
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&resp);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/edit")
            .cookie(cookie.clone())
            .set_form([("edit_prompt", "fail")])
            .to_request(),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/")
        .cookie(cookie.clone())
        .to_request();
    let page = text(test::call_and_read_body(&app, request).await);
    assert!(page.contains(r#"<p class="error">bad prompt</p>"#));
    assert!(page.contains(r#"<button type="submit">Edit image</button>"#));

    test::call_service(
        &app,
        test::TestRequest::post().uri("/reset").cookie(cookie.clone()).to_request(),
    )
    .await;
    let state: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/state").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(state["generate"]["status"], "idle");
    assert_eq!(state["edit"]["status"], "idle");
}

#[actix_web::test]
async fn health_reports_ok() {
    let api = Arc::new(ScriptedApi::default());
    let state = web::Data::new(AppState::new(api, 1));
    let app = test::init_service(App::new().app_data(state).configure(server::routes)).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(body["status"], "ok");
}
