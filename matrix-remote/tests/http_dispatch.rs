use std::sync::Arc;

use matrix_remote::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Answers every connection with `status` and reports the request line.
async fn fake_device(status: &'static str) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf);
            let line = head.lines().next().unwrap_or_default().to_owned();
            let _ = tx.send(line);

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 9\r\nconnection: close\r\n\r\nnot json!",
                status
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });

    (address, rx)
}

fn dispatcher_for(address: &str) -> Dispatcher {
    Dispatcher::http(Arc::new(StaticAddress(address.to_owned())))
}

#[tokio::test]
async fn brightness_reaches_device_as_query() {
    let (address, mut requests) = fake_device("200 OK").await;
    let dispatcher = dispatcher_for(&address);

    dispatcher
        .adjust_brightness(Direction::Up)
        .outcome()
        .await
        .unwrap();

    assert_eq!(requests.recv().await.unwrap(), "GET /?name=lum_up HTTP/1.1");
    assert!(requests.try_recv().is_err());
}

#[tokio::test]
async fn every_operation_sends_exactly_one_request() {
    let (address, mut requests) = fake_device("200 OK").await;
    let dispatcher = dispatcher_for(&format!("http://{}", address));

    dispatcher.navigate(Direction::Right).outcome().await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /?name=dir_right HTTP/1.1"
    );

    dispatcher.reset().outcome().await.unwrap();
    assert_eq!(requests.recv().await.unwrap(), "GET /?name=reset HTTP/1.1");

    dispatcher.toggle_play().outcome().await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /?name=toggle_play HTTP/1.1"
    );

    assert!(requests.try_recv().is_err());
}

#[tokio::test]
async fn server_errors_are_not_failures() {
    let (address, mut requests) = fake_device("500 Internal Server Error").await;
    let dispatcher = dispatcher_for(&address);

    assert!(dispatcher.reset().outcome().await.is_ok());
    assert_eq!(requests.recv().await.unwrap(), "GET /?name=reset HTTP/1.1");
}

#[tokio::test]
async fn unreachable_device_yields_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let dispatcher = dispatcher_for(&address);
    let handle = dispatcher.toggle_play();

    assert!(matches!(
        handle.outcome().await,
        Err(DispatchError::Transport(_))
    ));
}

#[tokio::test]
async fn device_path_is_kept() {
    let (address, mut requests) = fake_device("200 OK").await;
    let dispatcher = dispatcher_for(&format!("http://{}/panel", address));

    dispatcher.navigate(Direction::Down).outcome().await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /panel?name=dir_down HTTP/1.1"
    );
}
