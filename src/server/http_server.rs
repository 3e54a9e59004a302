use may::coroutine::JoinHandle;
use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Request headers parsed per connection before the request is rejected.
pub const MAX_HEADERS: usize = 32;

/// How long [`ServerHandle::wait_ready`] waits for the listener.
const READY_TIMEOUT: Duration = Duration::from_millis(250);
const READY_POLL: Duration = Duration::from_millis(5);

/// Listener for any `may_minihttp` service, usually an
/// [`AppService`](super::AppService).
///
/// ```no_run
/// use enzovu::hot_reload::SharedRouter;
/// use enzovu::server::{AppService, HttpServer};
/// use enzovu::Router;
///
/// let service = AppService::new(SharedRouter::new(Router::new()));
/// let server = HttpServer(service).start("127.0.0.1:8000")?;
/// server.wait_ready()?;
/// server.join().ok();
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct HttpServer<T>(pub T);

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Bind the first address `addr` resolves to and spawn the accept loop.
    ///
    /// # Errors
    ///
    /// Fails when `addr` resolves to nothing or the socket cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = first_addr(addr)?;
        let coroutine = HttpServerWithHeaders::<_, MAX_HEADERS>(self.0).start(addr)?;
        info!(address = %addr, max_headers = MAX_HEADERS, "Listening for connections");
        Ok(ServerHandle { addr, coroutine })
    }
}

fn first_addr<A: ToSocketAddrs>(addr: A) -> io::Result<SocketAddr> {
    addr.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
    })
}

/// A started server. Dropping the handle leaves the server running.
pub struct ServerHandle {
    addr: SocketAddr,
    coroutine: JoinHandle<()>,
}

impl ServerHandle {
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the listener accepts a TCP connection.
    ///
    /// # Errors
    ///
    /// `TimedOut` after 250ms without a successful connect.
    pub fn wait_ready(&self) -> io::Result<()> {
        self.wait_ready_for(READY_TIMEOUT)
    }

    /// [`wait_ready`](Self::wait_ready) with a caller-chosen deadline.
    ///
    /// # Errors
    ///
    /// `TimedOut` when `timeout` passes without a successful connect.
    pub fn wait_ready_for(&self, timeout: Duration) -> io::Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("server at {} not accepting connections", self.addr),
                ));
            }
            thread::sleep(READY_POLL);
        }
    }

    /// Cancel the accept loop and wait for it to unwind.
    pub fn stop(self) {
        // SAFETY: the coroutine is still owned through `self.coroutine`; it
        // unwinds at its next yield point and is joined right below.
        #[allow(unsafe_code)]
        unsafe {
            self.coroutine.coroutine().cancel();
        }
        if self.coroutine.join().is_err() {
            warn!(addr = %self.addr, "Server coroutine panicked while stopping");
        }
        info!(addr = %self.addr, "Server stopped");
    }

    /// Block until the accept loop exits on its own.
    ///
    /// # Errors
    ///
    /// The panic payload if the accept loop panicked.
    pub fn join(self) -> thread::Result<()> {
        self.coroutine.join()
    }
}
