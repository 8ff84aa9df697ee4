use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tank_battle::{
    report_detached, Difficulty, GameMode, GameRecord, HttpResultSink, MemoryResultSink, Nation,
    ResultSink,
};

fn record() -> GameRecord {
    GameRecord {
        side1_nation: Some(Nation::Us),
        side2_nation: Some(Nation::Japan),
        winner: 1,
        game_mode: GameMode::Ai(Difficulty::Nightmare),
    }
}

/// Accept one HTTP request, answer 200 and hand back the raw request.
fn one_shot_server() -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/game-results", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .unwrap();
        String::from_utf8(buf).unwrap()
    });
    (url, handle)
}

#[tokio::test]
async fn test_memory_sink_collects() {
    let sink = MemoryResultSink::new();
    sink.submit(&record()).await.unwrap();
    sink.submit(&record()).await.unwrap();
    assert_eq!(sink.records(), vec![record(), record()]);
}

#[tokio::test]
async fn test_detached_report_delivers() {
    let sink = MemoryResultSink::new();
    let handle = report_detached(Arc::new(sink.clone()), record());
    handle.await.unwrap();
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn test_http_sink_posts_json() {
    let (url, server) = one_shot_server();
    let sink = HttpResultSink::new(url.clone());
    assert_eq!(sink.url(), url);
    sink.submit(&record()).await.unwrap();

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /api/game-results"));
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["player1_nation"], "US");
    assert_eq!(json["player2_nation"], "Japan");
    assert_eq!(json["winner"], 1);
    assert_eq!(json["game_mode"], "ai-nightmare");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_only_logged() {
    // Bind then drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let sink = HttpResultSink::new(format!("http://127.0.0.1:{}/", port))
        .with_timeout(Duration::from_secs(2));
    assert!(sink.submit(&record()).await.is_err());

    let handle = report_detached(Arc::new(sink), record());
    assert!(handle.await.is_ok());
}

#[test]
fn test_record_round_trips_through_json() {
    let text = serde_json::to_string(&record()).unwrap();
    let back: GameRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(back, record());
}
