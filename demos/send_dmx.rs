//! Send a short chase to a KiNet controller
//!
//! Usage: `cargo run --example send_dmx -- 10.0.0.20`

use std::net::Ipv4Addr;
use std::thread;
use std::time::Duration;

use kinet::{DmxBuffer, Node, NoReadiness, UdpBinding};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target: Ipv4Addr = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("127.0.0.1")
        .parse()?;

    println!("KiNet chase -> {target}");
    println!("====================\n");

    let mut node = Node::new(UdpBinding::new(), NoReadiness);
    node.start()?;

    let mut universe = DmxBuffer::new();
    for step in 0..24 {
        universe.clear();
        universe.set_channel(step % 8, 255);
        node.send_dmx(target, &universe)?;
        node.send_port_out(target, 1, &universe)?;
        thread::sleep(Duration::from_millis(40));
    }

    let stats = node.stats();
    println!(
        "Sent {} packets ({} bytes), next transaction {}",
        stats.packets_sent,
        stats.bytes_sent,
        node.next_transaction()
    );

    node.stop()?;
    Ok(())
}
