//! Constants carrying several payload fields.
//!
//! Run with: cargo run --example codes

use enum_family::prelude::*;

enumeration! {
    pub struct ErrorCode {
        pub code: i32,
        pub desc: &'static str,
    }
    Success { code: 0, desc: "success" },
    Failed { code: -1, desc: "unknown failure" },
    NetworkError { code: 500, desc: "network error" },
    EncodeError { code: 600, desc: "encode error" },
}

fn describe(name: &str) -> String {
    match name.parse::<ErrorCode>() {
        Ok(code) => format!("{} => {} ({})", code, code.code, code.desc),
        Err(err) => err.to_string(),
    }
}

fn main() {
    println!("=== Error codes ===\n");

    for name in ["NetworkError", "Timeout"] {
        println!("  {}", describe(name));
    }

    let json = serde_json::to_string(ErrorCode::values()).expect("names serialize");
    println!("\n  as json: {json}");
}
