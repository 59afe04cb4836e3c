use serde_json::json;
use tidelink_protocol::{LoadResult, LoadType, passthrough_response, translate_response};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::{ManagerOptions, NodeOptions};

fn config_for(server: &MockServer, api_version: &str) -> DriverConfig {
	let addr = server.address();
	let node = NodeOptions {
		host: addr.ip().to_string(),
		port: addr.port(),
		auth: "pw".to_string(),
		..Default::default()
	};
	let manager = ManagerOptions {
		client_id: "42".to_string(),
		user_agent: "tidelink-tests/1.0".to_string(),
		..Default::default()
	};
	DriverConfig::new(manager, node, api_version).unwrap()
}

fn requester(server: &MockServer, translator: Translator) -> Requester {
	Requester::new("test@1", Client::new(), &config_for(server, "v4"), translator)
}

fn album_body() -> Value {
	json!({
		"loadType": "album",
		"data": {
			"info": {"name": "Discovery", "selectedTrack": -1},
			"pluginInfo": {},
			"tracks": []
		}
	})
}

#[test]
fn descriptor_builder_collects_parts() {
	let descriptor = RequestDescriptor::patch("/sessions/abc")
		.param("noReplace", "true")
		.header("X-Trace", "1")
		.data(json!({"resuming": true}))
		.with_session_id();

	assert_eq!(descriptor.method, Method::Patch);
	assert_eq!(descriptor.params, vec![("noReplace".to_string(), "true".to_string())]);
	assert!(descriptor.use_session_id);
	assert!(descriptor.body.is_none());
}

#[tokio::test]
async fn params_replace_path_query() {
	let server = MockServer::start().await;
	let requester = requester(&server, passthrough_response);

	let url = requester
		.url_for(&RequestDescriptor::get("/loadtracks?identifier=old").param("identifier", "ytsearch:daft punk"))
		.unwrap();
	assert_eq!(url.path(), "/v4/loadtracks");
	assert_eq!(url.query(), Some("identifier=ytsearch%3Adaft+punk"));
}

#[tokio::test]
async fn dialect_authorization_always_wins() {
	let server = MockServer::start().await;
	let requester = requester(&server, passthrough_response);

	let descriptor = RequestDescriptor::get("/info")
		.header("Authorization", "spoofed")
		.header("User-Agent", "custom-agent")
		.header("X-Trace", "1");
	let headers = requester.headers_for(&descriptor).unwrap();

	assert_eq!(headers[AUTHORIZATION], "pw");
	assert_eq!(headers[USER_AGENT], "custom-agent");
	assert_eq!(headers["x-trace"], "1");
	assert!(!headers.contains_key(CONTENT_TYPE));
}

#[tokio::test]
async fn no_content_is_absent() {
	let server = MockServer::start().await;
	Mock::given(method("DELETE"))
		.and(path("/v4/sessions/abc/players/1"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let result = requester(&server, passthrough_response)
		.send::<Value>(&RequestDescriptor::delete("/sessions/abc/players/1"))
		.await
		.unwrap();
	assert!(result.is_none());
}

#[tokio::test]
async fn error_statuses_are_soft_failures() {
	let server = MockServer::start().await;
	Mock::given(path("/v4/missing"))
		.respond_with(ResponseTemplate::new(404).set_body_string("not found"))
		.mount(&server)
		.await;
	Mock::given(path("/v4/broken"))
		.respond_with(ResponseTemplate::new(500).set_body_string("{not json"))
		.mount(&server)
		.await;

	let requester = requester(&server, passthrough_response);
	assert!(requester.send::<Value>(&RequestDescriptor::get("/missing")).await.unwrap().is_none());
	assert!(requester.send::<Value>(&RequestDescriptor::get("/broken")).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_ok_body_is_parse_error() {
	let server = MockServer::start().await;
	Mock::given(path("/v4/info"))
		.respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
		.mount(&server)
		.await;

	let err = requester(&server, passthrough_response)
		.send::<Value>(&RequestDescriptor::get("/info"))
		.await
		.unwrap_err();
	assert!(err.is_parse());
}

#[tokio::test]
async fn nodelink_translator_rewrites_load_type() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v4/loadtracks"))
		.and(query_param("identifier", "https://example.com/album/1"))
		.and(header("authorization", "pw"))
		.and(header("user-agent", "tidelink-tests/1.0"))
		.respond_with(ResponseTemplate::new(200).set_body_json(album_body()))
		.expect(1)
		.mount(&server)
		.await;

	let descriptor = RequestDescriptor::get("/loadtracks").param("identifier", "https://example.com/album/1");
	let value = requester(&server, translate_response).send::<Value>(&descriptor).await.unwrap().unwrap();

	let mut expected = album_body();
	expected["loadType"] = json!("playlist");
	assert_eq!(value, expected);

	let typed: LoadResult = serde_json::from_value(value).unwrap();
	assert_eq!(typed.load_type(), LoadType::Playlist);
}

#[tokio::test]
async fn null_load_type_is_not_translated() {
	let server = MockServer::start().await;
	let body = json!({"loadType": null, "data": {"name": "x"}});
	Mock::given(path("/v4/loadtracks"))
		.respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
		.mount(&server)
		.await;

	let value = requester(&server, translate_response)
		.send::<Value>(&RequestDescriptor::get("/loadtracks"))
		.await
		.unwrap()
		.unwrap();
	assert_eq!(value, body);
}

#[tokio::test]
async fn passthrough_leaves_load_type_alone() {
	let server = MockServer::start().await;
	Mock::given(path("/v4/loadtracks"))
		.respond_with(ResponseTemplate::new(200).set_body_json(album_body()))
		.mount(&server)
		.await;

	let value = requester(&server, passthrough_response)
		.send::<Value>(&RequestDescriptor::get("/loadtracks"))
		.await
		.unwrap()
		.unwrap();
	assert_eq!(value["loadType"], "album");
}

#[tokio::test]
async fn data_is_sent_as_json() {
	let server = MockServer::start().await;
	Mock::given(method("PATCH"))
		.and(path("/v4/sessions/abc"))
		.and(header("content-type", "application/json"))
		.and(body_json(json!({"resuming": true, "timeout": 60})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"resuming": true, "timeout": 60})))
		.expect(1)
		.mount(&server)
		.await;

	let descriptor = RequestDescriptor::patch("/sessions/abc").data(json!({"resuming": true, "timeout": 60}));
	let value = requester(&server, passthrough_response).send::<Value>(&descriptor).await.unwrap().unwrap();
	assert_eq!(value["timeout"], 60);
}

#[tokio::test]
async fn typed_decode_failure_is_parse_error() {
	let server = MockServer::start().await;
	Mock::given(path("/v4/decodetrack"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"encoded": 5})))
		.mount(&server)
		.await;

	let err = requester(&server, passthrough_response)
		.send::<tidelink_protocol::RawTrack>(&RequestDescriptor::get("/decodetrack"))
		.await
		.unwrap_err();
	assert!(err.is_parse());
}
