//! Live detection event stream.

use anyhow::Result;
use client::ApiClient;

use crate::render;

pub async fn run(client: &ApiClient) -> Result<()> {
    let mut stream = client.stream_events().await?;
    println!("following live events; Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = stream.next_event() => match event? {
                Some(event) => println!("{}", render::live_event_line(&event)),
                None => {
                    println!("stream closed by server");
                    break;
                }
            }
        }
    }

    stream.close();
    Ok(())
}
