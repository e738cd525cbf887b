//! Integration tests for region bots seen through the IRC bridge.

mod common;

use common::TestServer;

const ONE_BOT: &str = r#"
[[bot]]
first_name = "Default"
start = [128.0, 128.0, 25.0]
"#;

#[tokio::test]
async fn test_bot_is_listed() {
    let server = TestServer::spawn_with(17311, None, ONE_BOT)
        .await
        .expect("Failed to spawn test server");

    let mut client = server.connect("ann").await.expect("Failed to connect");
    let lines = client
        .register("Ann Avatar")
        .await
        .expect("Registration failed");

    assert!(lines.contains(&"353 RPL_NAMREPLY \"#My-Region :+DefaultRexBot1\"".to_string()));
}

#[tokio::test]
async fn test_bot_answers_unknown_command() {
    let server = TestServer::spawn_with(17312, None, ONE_BOT)
        .await
        .expect("Failed to spawn test server");

    let mut client = server.connect("ann").await.expect("Failed to connect");
    client.register("Ann Avatar").await.expect("Registration failed");

    client
        .privmsg("#My-Region", "!dance")
        .await
        .expect("Failed to send PRIVMSG");

    assert_eq!(
        client.recv().await.expect("Bot did not answer"),
        ":DefaultRexBot1 PRIVMSG #My-Region :Sorry. Don't understand your message !dance"
    );
}

#[tokio::test]
async fn test_plain_chat_is_not_answered() {
    let server = TestServer::spawn_with(17313, None, ONE_BOT)
        .await
        .expect("Failed to spawn test server");

    let mut client = server.connect("ann").await.expect("Failed to connect");
    client.register("Ann Avatar").await.expect("Registration failed");

    client.privmsg("#My-Region", "hello bot").await.unwrap();
    client.drain().await;

    client.send_raw("PING after").await.unwrap();
    assert_eq!(client.recv().await.unwrap(), "PONG after");
}
