use relaynet_transport::connections::DUMMY_CANDIDATE;

use super::*;

#[tokio::test]
async fn test_init_negotiates_and_opens() {
    let resolver = TestResolver::new();
    let signaling = ScriptedSignaling::new(SdpBehavior::Answer);
    let announcements = signaling.sdp_announcements.clone();
    let candidates = signaling.candidates.clone();

    let config = ClientConfig::default();
    let transport = DummyTransport::new(&config.ice_servers);
    let client =
        Client::init_with(transport, resolver.network_params(), signaling.boxed(), config)
            .await
            .unwrap();

    let announcements = announcements.lock().unwrap();
    assert_eq!(announcements.len(), 1);
    assert_eq!(announcements[0].0, client.session_id());
    assert_eq!(announcements[0].1.sdp_type, SdpType::Offer);

    let expected: IceCandidate = DUMMY_CANDIDATE.parse().unwrap();
    let candidates = candidates.lock().unwrap();
    assert_eq!(
        *candidates,
        vec![(client.session_id().to_string(), expected)]
    );

    assert_eq!(
        client
            .transport()
            .channel_label(client.session_id())
            .unwrap(),
        "default"
    );
}

#[tokio::test]
async fn test_execute_round_trips_encrypted() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let request = wallet_request("1");
    let exec = spawn_execute(&client, "1");

    let frames = wait_for_frames(&client, 1).await;
    let (wire_request, request_json) = resolver.read_request(&frames[0]);

    assert!(wire_request.encrypted);
    assert_eq!(request_json, request);
    // The ciphertext must not be readable as json.
    assert!(serde_json::from_slice::<serde_json::Value>(&wire_request.payload).is_err());
    // The ephemeral key mirrors the resolver key kind.
    assert_eq!(wire_request.public_key.len(), 33);
    assert!(matches!(wire_request.public_key[0], 2 | 3));

    let response = ok_response("1", serde_json::json!(555));
    client
        .transport()
        .emit_message(client.session_id(), resolver.respond(&wire_request, &response))
        .await
        .unwrap();

    assert_eq!(exec.await.unwrap().unwrap(), response);
}

#[tokio::test]
async fn test_concurrent_executes_settle_out_of_order() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let mut execs = Vec::new();
    for id in 1..=3 {
        execs.push(spawn_execute(&client, &id.to_string()));
    }

    let frames = wait_for_frames(&client, 3).await;
    let mut requests: Vec<_> = frames
        .iter()
        .map(|frame| resolver.read_request(frame).0)
        .collect();
    // Settle in reverse id order, no matter the sending order.
    requests.sort_by(|a, b| b.id.cmp(&a.id));

    for request in &requests {
        let balance = serde_json::json!(format!("balance-{}", request.id));
        let response = ok_response(&request.id, balance);
        client
            .transport()
            .emit_message(client.session_id(), resolver.respond(request, &response))
            .await
            .unwrap();
    }

    for (i, exec) in execs.into_iter().enumerate() {
        let id = (i + 1).to_string();
        let response = exec.await.unwrap().unwrap();
        assert_eq!(response.id, id);
        assert_eq!(response.result, serde_json::json!(format!("balance-{id}")));
    }
}

#[tokio::test]
async fn test_plaintext_request_round_trips() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let request = JsonRequest {
        id: "1".to_string(),
        method: "GetSmartContractCount".to_string(),
        params: vec![],
    };

    let exec = tokio::spawn({
        let client = client.clone();
        let request = request.clone();
        async move { client.execute(&request, false).await }
    });

    let frames = wait_for_frames(&client, 1).await;
    let (wire_request, request_json) = resolver.read_request(&frames[0]);

    assert!(!wire_request.encrypted);
    assert_eq!(request_json, request);
    // The payload travels as readable json.
    assert_eq!(
        serde_json::from_slice::<JsonRequest>(&wire_request.payload).unwrap(),
        request
    );
    // An ephemeral key is attached regardless, so the response can still be
    // encrypted.
    assert_eq!(wire_request.public_key.len(), 33);

    let response = ok_response("1", serde_json::json!(12));
    client
        .transport()
        .emit_message(client.session_id(), resolver.respond(&wire_request, &response))
        .await
        .unwrap();

    assert_eq!(exec.await.unwrap().unwrap(), response);
}

#[tokio::test]
async fn test_response_with_clear_flag_still_decrypts() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 1).await;
    let (wire_request, _) = resolver.read_request(&frames[0]);

    let body = serde_json::to_vec(&ok_response("1", serde_json::json!(555))).unwrap();
    let payload = ecies::encrypt(&wire_request.public_key, &body).unwrap();

    // Encrypted payload with the flag left clear. The json probe fails and
    // the client falls back to decryption.
    let frame = response_frame(resolver::ResolverResponse {
        id: "1".to_string(),
        encrypted: false,
        result: Some(resolver::resolver_response::Result::Payload(payload)),
    });
    client
        .transport()
        .emit_message(client.session_id(), frame)
        .await
        .unwrap();

    let response = exec.await.unwrap().unwrap();
    assert_eq!(response.result, serde_json::json!(555));
}

#[tokio::test]
async fn test_remote_error_rejects() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 1).await;
    let (wire_request, _) = resolver.read_request(&frames[0]);

    let frame = response_frame(resolver::ResolverResponse {
        id: wire_request.id.clone(),
        encrypted: false,
        result: Some(resolver::resolver_response::Result::Error(resolver::Error {
            code: resolver::ErrorCode::ErrInternalException as i32,
            message: "unknown public key".to_string(),
        })),
    });
    client
        .transport()
        .emit_message(client.session_id(), frame)
        .await
        .unwrap();

    match exec.await.unwrap() {
        Err(Error::Remote(message)) => assert_eq!(message, "unknown public key"),
        other => panic!("expected a remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_level_error_resolves() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 1).await;
    let (wire_request, _) = resolver.read_request(&frames[0]);

    // Api failures are reported inside the json body and resolve normally;
    // inspecting them is the caller's business.
    let response = JsonResponse {
        id: "1".to_string(),
        result: serde_json::json!(0),
        error: "Unrecognized method".to_string(),
    };
    client
        .transport()
        .emit_message(client.session_id(), resolver.respond(&wire_request, &response))
        .await
        .unwrap();

    let resolved = exec.await.unwrap().unwrap();
    assert_eq!(resolved.error, "Unrecognized method");
    assert_eq!(resolved.result, serde_json::json!(0));
}

#[tokio::test]
async fn test_unrelated_frames_are_dropped() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 1).await;
    let (wire_request, _) = resolver.read_request(&frames[0]);

    // A response to a request nobody sent.
    let ghost = response_frame(resolver::ResolverResponse {
        id: "ghost".to_string(),
        encrypted: false,
        result: Some(resolver::resolver_response::Result::Payload(
            serde_json::to_vec(&ok_response("ghost", serde_json::json!(1))).unwrap(),
        )),
    });
    client
        .transport()
        .emit_message(client.session_id(), ghost)
        .await
        .unwrap();

    // A relay-level failure, which carries no request id.
    let relay_error = relayer::OutgoingMessage {
        public_key: vec![],
        result: Some(relayer::outgoing_message::Result::Error(relayer::Error {
            code: relayer::ErrorCode::ErrResolverLookupFailed as i32,
            message: "no resolver for keys".to_string(),
        })),
    };
    client
        .transport()
        .emit_message(client.session_id(), relay_error.encode_to_vec().into())
        .await
        .unwrap();

    // A frame with no result at all.
    let empty = relayer::OutgoingMessage::default();
    client
        .transport()
        .emit_message(client.session_id(), empty.encode_to_vec().into())
        .await
        .unwrap();

    // None of those touched the pending request.
    let response = ok_response("1", serde_json::json!(555));
    client
        .transport()
        .emit_message(client.session_id(), resolver.respond(&wire_request, &response))
        .await
        .unwrap();
    assert_eq!(exec.await.unwrap().unwrap(), response);
}

#[tokio::test]
async fn test_unset_result_rejects_with_protocol_error() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 1).await;
    resolver.read_request(&frames[0]);

    let frame = response_frame(resolver::ResolverResponse {
        id: "1".to_string(),
        encrypted: false,
        result: None,
    });
    client
        .transport()
        .emit_message(client.session_id(), frame)
        .await
        .unwrap();

    assert!(matches!(exec.await.unwrap(), Err(Error::Protocol(_))));
}

#[tokio::test]
async fn test_request_times_out() {
    let config = ClientConfig {
        request_timeout: Duration::from_millis(200),
        ..ClientConfig::default()
    };
    let (client, resolver) = connected_client(config).await;

    assert!(matches!(
        client.execute(&wallet_request("1"), true).await,
        Err(Error::RequestTimeout)
    ));

    // The timed out entry was evicted; its id is free for reuse.
    let exec = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 2).await;
    let (wire_request, _) = resolver.read_request(&frames[1]);

    let response = ok_response("1", serde_json::json!(555));
    client
        .transport()
        .emit_message(client.session_id(), resolver.respond(&wire_request, &response))
        .await
        .unwrap();
    assert_eq!(exec.await.unwrap().unwrap(), response);
}

#[tokio::test]
async fn test_close_drains_pending_and_fails_fast() {
    let (client, _resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    wait_for_frames(&client, 1).await;

    client.close().await.unwrap();
    assert!(matches!(exec.await.unwrap(), Err(Error::ChannelClosed)));

    // Further requests fail before anything is sent.
    assert!(matches!(
        client.execute(&wallet_request("2"), true).await,
        Err(Error::ChannelNotOpen)
    ));
}

#[tokio::test]
async fn test_remote_close_drains_pending() {
    let (client, _resolver) = connected_client(ClientConfig::default()).await;

    let exec = spawn_execute(&client, "1");
    wait_for_frames(&client, 1).await;

    client
        .transport()
        .emit_data_channel_close(client.session_id())
        .await
        .unwrap();
    assert!(matches!(exec.await.unwrap(), Err(Error::ChannelClosed)));

    assert!(matches!(
        client.execute(&wallet_request("2"), true).await,
        Err(Error::ChannelNotOpen)
    ));
}

#[tokio::test]
async fn test_same_id_supersedes_earlier_request() {
    let (client, resolver) = connected_client(ClientConfig::default()).await;

    let first = spawn_execute(&client, "1");
    wait_for_frames(&client, 1).await;
    let second = spawn_execute(&client, "1");
    let frames = wait_for_frames(&client, 2).await;

    assert!(matches!(first.await.unwrap(), Err(Error::RequestSuperseded)));

    // The second request has its own ephemeral key.
    let (wire_request, _) = resolver.read_request(&frames[1]);
    let response = ok_response("1", serde_json::json!(555));
    client
        .transport()
        .emit_message(client.session_id(), resolver.respond(&wire_request, &response))
        .await
        .unwrap();
    assert_eq!(second.await.unwrap().unwrap(), response);
}

#[tokio::test]
async fn test_init_rejects_when_signaling_fails() {
    let resolver = TestResolver::new();
    let signaling = ScriptedSignaling::new(SdpBehavior::Fail("sdp rejected".to_string()));
    let config = ClientConfig::default();
    let transport = DummyTransport::new(&config.ice_servers);

    let result =
        Client::init_with(transport, resolver.network_params(), signaling.boxed(), config).await;
    match result {
        Err(Error::Negotiation(message)) => assert!(message.contains("sdp rejected")),
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("init unexpectedly succeeded"),
    }
}

#[tokio::test]
async fn test_init_rejects_wrong_typed_answer() {
    let resolver = TestResolver::new();
    let signaling = ScriptedSignaling::new(SdpBehavior::WrongTypeAnswer);
    let config = ClientConfig::default();
    let transport = DummyTransport::new(&config.ice_servers);

    let result =
        Client::init_with(transport, resolver.network_params(), signaling.boxed(), config).await;
    match result {
        Err(Error::Negotiation(message)) => assert!(message.contains("not an answer")),
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("init unexpectedly succeeded"),
    }
}

#[tokio::test]
async fn test_init_times_out_when_signaling_hangs() {
    let resolver = TestResolver::new();
    let signaling = ScriptedSignaling::new(SdpBehavior::Hang);
    let config = ClientConfig {
        negotiation_timeout: Duration::from_millis(200),
        ..ClientConfig::default()
    };
    let transport = DummyTransport::new(&config.ice_servers);

    let result =
        Client::init_with(transport, resolver.network_params(), signaling.boxed(), config).await;
    assert!(matches!(result, Err(Error::NegotiationTimeout)));
}

#[tokio::test]
async fn test_init_rejects_unusable_registry_key() {
    let signaling = ScriptedSignaling::new(SdpBehavior::Answer);
    let config = ClientConfig::default();
    let transport = DummyTransport::new(&config.ice_servers);

    let params = NetworkParams {
        relayer_address: "http://localhost:8080".to_string(),
        resolver_public_key: "0xdeadbeef".to_string(),
    };

    let result = Client::init_with(transport, params, signaling.boxed(), config).await;
    assert!(matches!(result, Err(Error::Registry(_))));
}
