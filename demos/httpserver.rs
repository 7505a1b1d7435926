extern crate argparse;
extern crate env_logger;
extern crate onehttp;
extern crate sha1;
#[macro_use] extern crate log;

use std::env;
use std::net::TcpStream;
use std::thread;

use argparse::{ArgumentParser, Store};
use sha1::Sha1;

use onehttp::{Server, Config, Status, Request, ResponseWriter, Headers};
use onehttp::response::default_headers;


fn plain(writer: &mut ResponseWriter<TcpStream>, status: Status, body: &str) {
    writer.write_status_line(status).unwrap();
    let mut headers = default_headers(body.len());
    headers.set_date();
    writer.write_headers(&headers).unwrap();
    writer.write_body(body.as_bytes()).unwrap();
}

/// Streams twenty lines as chunks and closes with digest trailers so the
/// client can verify what it received.
fn stream(writer: &mut ResponseWriter<TcpStream>) {
    let mut headers = Headers::new();
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-SHA1, X-Content-Length");
    writer.write_status_line(Status::Ok).unwrap();
    writer.write_headers(&headers).unwrap();

    let mut sha = Sha1::new();
    let mut total = 0;
    for i in 0..20 {
        let line = format!("data line {}\n", i);
        sha.update(line.as_bytes());
        total += line.len();
        writer.write_chunked_body(line.as_bytes()).unwrap();
    }
    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA1", &sha.digest().to_string());
    trailers.set("X-Content-Length", &total.to_string());
    writer.write_chunked_body_done(Some(&trailers)).unwrap();
}

fn service(writer: &mut ResponseWriter<TcpStream>, request: Request) {
    match request.target() {
        "/yourproblem" => {
            plain(writer, Status::BadRequest,
                "Your problem is not my problem\n");
        }
        "/myproblem" => {
            plain(writer, Status::InternalServerError,
                "Woopsie, my bad\n");
        }
        "/stream" => stream(writer),
        _ => plain(writer, Status::Ok, "All good, frfr\n"),
    }
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let mut port = 42069;
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Serve a few demo responses over HTTP/1.1");
        ap.refer(&mut port)
            .add_option(&["-p", "--port"], Store,
                "Port to listen on (default 42069)");
        ap.parse_args_or_exit();
    }

    let config = Config::new().done();
    let server = Server::serve(port, &config, service)
        .expect("bind server");
    info!("server started on port {}", server.local_addr().port());

    loop {
        thread::park();
    }
}
