extern crate argparse;
extern crate env_logger;
extern crate onehttp;
#[macro_use] extern crate log;

use std::env;
use std::net::TcpListener;

use argparse::{ArgumentParser, Store};

use onehttp::Request;


/// Accepts raw connections and dumps whatever request arrives, without
/// ever answering. Point curl at it to watch the parser work.
fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let mut port = 42069;
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Print every request received on a port");
        ap.refer(&mut port)
            .add_option(&["-p", "--port"], Store,
                "Port to listen on (default 42069)");
        ap.parse_args_or_exit();
    }

    let listener = TcpListener::bind(("0.0.0.0", port)).expect("bind");
    info!("listening on port {}", port);

    for connection in listener.incoming() {
        let mut connection = match connection {
            Ok(connection) => connection,
            Err(e) => {
                error!("accept error: {}", e);
                continue;
            }
        };
        match Request::from_reader(&mut connection) {
            Ok(request) => {
                println!("Request line:");
                println!("- Method: {}", request.method());
                println!("- Target: {}", request.target());
                println!("- Version: {}", request.version());
                println!("Headers:");
                for (name, value) in request.headers().iter() {
                    println!("- {}: {}", name, value);
                }
                println!("Body:");
                println!("{}", String::from_utf8_lossy(request.body()));
            }
            Err(e) => error!("parse error: {}", e),
        }
    }
}
