//! Minimal end-to-end demo client.
//!
//! Expects a running rasterlab-server whose accounts file contains the
//! demo user. Uploads a small test image, runs the gradient kernel
//! remotely, and prints the result models.
//!
//! ```text
//! RASTERLAB_ADDR=127.0.0.1:9300 RASTERLAB_USER=demo RASTERLAB_PASSWORD=demo \
//!     cargo run -p rasterlab-client --example remote_run
//! ```

use std::env;
use std::error::Error;

use rasterlab_client::WorkbenchClient;
use rasterlab_core::{Catalog, GradientField, RasterImage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let addr = env::var("RASTERLAB_ADDR").unwrap_or_else(|_| "127.0.0.1:9300".to_string());
    let user = env::var("RASTERLAB_USER").unwrap_or_else(|_| "demo".to_string());
    let password = env::var("RASTERLAB_PASSWORD").unwrap_or_else(|_| "demo".to_string());

    println!("Connecting to {}...", addr);
    let catalog = Catalog::builtin();
    let mut client = WorkbenchClient::connect(&addr, &catalog).await?;

    client.login(&user, &password).await?;
    println!("Logged in as {}.", user);

    // A 4x4 ramp with a bright spot in the middle.
    let mut pixels = vec![0.0f32; 16];
    for (i, p) in pixels.iter_mut().enumerate() {
        *p = (i % 4) as f32;
    }
    pixels[5] = 9.0;
    let image = RasterImage::new("demo.input", 4, 4, pixels);

    client.send_model(&image).await?;
    println!("Uploaded {}.", image.name);

    let algorithm = GradientField::new(image.clone(), "demo.gradient");
    let results = client.run_algorithm(&algorithm).await?;

    println!("{} result model(s):", results.len());
    for name in &results {
        match client.workspace().render_model(name) {
            Some(summary) => println!("  {}", summary),
            None => println!("  {}", name),
        }
    }

    Ok(())
}
