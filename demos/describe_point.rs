//! Describe Point - Retry on Overflow
//!
//! Simulasi caller yang tidak tahu ukuran tape di depan:
//! 1. Coba encode ke buffer kecil
//! 2. Jika overflow, buang writer dan ulangi dengan buffer 2x lipat
//! 3. Decode hasilnya dan cetak tree
//!
//! Usage:
//!   cargo run --release --example describe_point

use structtape::{parse_regions, BufferOverflow, Describe, Writer};

/// Node linked list - field `next` menunjuk ke node lain
#[repr(C)]
struct Node {
    value: i64,
    next: Option<Box<Node>>,
}

impl Describe for Node {
    const KIND: &'static str = "Node";

    fn describe_fields(&self, w: &mut Writer<'_>) {
        let _ = w.struct_field("value", "long", &self.value);
        let _ = w.struct_field("next", "struct Node *", &self.next);
    }
}

fn encode_list(head: &Node, buf: &mut [u8]) -> Result<usize, BufferOverflow> {
    let mut w = Writer::new(buf);
    let mut node = Some(head);
    while let Some(n) = node {
        w.describe(n).ok();
        node = n.next.as_deref();
    }
    w.close().ok();
    w.status()?;
    Ok(w.len())
}

fn main() {
    let list = Node {
        value: 1,
        next: Some(Box::new(Node {
            value: 2,
            next: Some(Box::new(Node {
                value: 3,
                next: None,
            })),
        })),
    };

    let mut capacity = 16;
    let (buf, len) = loop {
        let mut buf = vec![0u8; capacity];
        match encode_list(&list, &mut buf) {
            Ok(len) => break (buf, len),
            Err(e) => {
                println!("⚠️  {} - retrying with {} bytes", e, capacity * 2);
                capacity *= 2;
            }
        }
    };

    println!("✅ Encoded {} bytes (capacity {})\n", len, capacity);

    match parse_regions(&buf[..len]) {
        Ok(regions) => {
            for region in regions {
                println!("📦 {} @ 0x{:x} ({} bytes)", region.kind, region.address, region.size);
                for field in region.fields {
                    println!(
                        "   ├─ {}: {} @ 0x{:x} ({} bytes)",
                        field.name, field.type_name, field.address, field.size
                    );
                }
            }
        }
        Err(e) => eprintln!("❌ Decode error: {}", e),
    }
}
