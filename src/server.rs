//! TCP accept loop and per-connection request driving
//!
//! One thread accepts, one thread per connection parses and answers. The
//! only state shared between them is the atomic `closed` flag that lets
//! `Server::close` shut the accept loop down without racing it.
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use enums::Status;
use error::ParseError;
use request::Request;
use response::{ResponseWriter, default_headers};


/// Per-connection deadlines. The engine itself never imposes timeouts;
/// these are applied to each accepted socket as it comes in.
#[derive(Debug, Clone)]
pub struct Config {
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl Config {
    /// Create a config with defaults (no deadlines).
    pub fn new() -> Config {
        Config {
            read_timeout: None,
            write_timeout: None,
        }
    }
    /// Deadline for each read from a connection.
    pub fn read_timeout(&mut self, value: Duration) -> &mut Self {
        self.read_timeout = Some(value);
        self
    }
    /// Deadline for each write to a connection.
    pub fn write_timeout(&mut self, value: Duration) -> &mut Self {
        self.write_timeout = Some(value);
        self
    }
    /// Create an Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}

/// A request handler invoked once per successfully parsed request.
///
/// The handler owns the response: it may write a full status/headers/body
/// sequence through the writer or nothing at all, in which case the
/// connection is simply closed.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, writer: &mut ResponseWriter<TcpStream>, request: Request);
}

impl<F> Handler for F
    where F: Fn(&mut ResponseWriter<TcpStream>, Request) + Send + Sync + 'static
{
    fn handle(&self, writer: &mut ResponseWriter<TcpStream>, request: Request) {
        (self)(writer, request)
    }
}

/// Handle to a running server.
///
/// Dropping the handle closes the server.
pub struct Server {
    addr: SocketAddr,
    closed: Arc<AtomicBool>,
}

impl Server {
    /// Binds the listener and starts accepting in a background thread.
    ///
    /// Port 0 asks the OS for an ephemeral port; `local_addr` reports the
    /// one actually bound.
    pub fn serve<H: Handler>(port: u16, config: &Arc<Config>, handler: H)
        -> io::Result<Server>
    {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        let addr = listener.local_addr()?;
        let closed = Arc::new(AtomicBool::new(false));
        let accept_closed = closed.clone();
        let accept_config = config.clone();
        let handler = Arc::new(handler);
        thread::spawn(move || {
            accept_loop(listener, accept_closed, accept_config, handler)
        });
        Ok(Server {
            addr: addr,
            closed: closed,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections. Idempotent.
    ///
    /// Connections already being served run to completion. Accept errors
    /// observed after closing are swallowed.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        // The accept thread is blocked in accept(); poke it over loopback
        // so it wakes up and observes the flag.
        let _ = TcpStream::connect(("127.0.0.1", self.addr.port()));
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.close();
    }
}

fn accept_loop<H: Handler>(listener: TcpListener, closed: Arc<AtomicBool>,
    config: Arc<Config>, handler: Arc<H>)
{
    loop {
        match listener.accept() {
            Ok((connection, peer)) => {
                if closed.load(Ordering::SeqCst) {
                    return;
                }
                debug!("accepted connection from {}", peer);
                let config = config.clone();
                let handler = handler.clone();
                thread::spawn(move || {
                    handle_connection(connection, config, handler)
                });
            }
            Err(e) => {
                if closed.load(Ordering::SeqCst) {
                    return;
                }
                error!("accept error: {}", e);
            }
        }
    }
}

fn handle_connection<H: Handler>(mut connection: TcpStream,
    config: Arc<Config>, handler: Arc<H>)
{
    if let Err(e) = apply_deadlines(&connection, &config) {
        error!("cannot set connection deadlines: {}", e);
        return;
    }
    let request = match Request::from_reader(&mut connection) {
        Ok(request) => request,
        Err(e) => {
            info!("closing connection: {}", e);
            bad_request(connection, &e);
            return;
        }
    };
    debug!("{} {}", request.method(), request.target());
    let mut writer = ResponseWriter::new(connection);
    handler.handle(&mut writer, request);
    // dropping the writer closes the connection
}

fn apply_deadlines(connection: &TcpStream, config: &Config)
    -> io::Result<()>
{
    connection.set_read_timeout(config.read_timeout)?;
    connection.set_write_timeout(config.write_timeout)?;
    Ok(())
}

/// Best-effort plain-text `400 Bad Request` before hanging up on a peer
/// that sent something unparseable. The peer may be gone already, so
/// write errors are ignored.
fn bad_request(connection: TcpStream, err: &ParseError) {
    let mut writer = ResponseWriter::new(connection);
    let body = format!("{}\n", err);
    if writer.write_status_line(Status::BadRequest).is_err() {
        return;
    }
    let _ = writer.write_headers(&default_headers(body.len()));
    let _ = writer.write_body(body.as_bytes());
}
