//! Fetch a URL with the default transport and print the response body.
//!
//! ```sh
//! cargo run --example fetch -- http://example.com
//! ```

use courier_core::{Request, RequestError};

fn main() -> Result<(), RequestError> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://example.com".to_string());
    let response = Request::new(url).send_must_succeed()?;
    println!("{}", String::from_utf8_lossy(&response.body));
    Ok(())
}
