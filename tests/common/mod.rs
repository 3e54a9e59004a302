#![allow(dead_code)]

pub mod http {
    use enzovu::server::{Request, Response};
    use enzovu::Router;
    use http::Method;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    pub fn request(method: Method, path: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Vec::new())
            .unwrap()
    }

    pub fn get(router: &Router, path: &str) -> Response {
        router.handle(request(Method::GET, path))
    }

    /// Write a raw HTTP/1.1 request and read until the server goes quiet.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {e:?}"),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Split a raw response into (status, content type, body).
    pub fn parse_response_parts(resp: &str) -> (u16, String, String) {
        let mut parts = resp.splitn(2, "\r\n\r\n");
        let headers = parts.next().unwrap_or("");
        let body = parts.next().unwrap_or("").to_string();
        let mut status = 0;
        let mut content_type = String::new();
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            } else if let Some((name, val)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-type") {
                    content_type = val.trim().to_string();
                }
            }
        }
        (status, content_type, body)
    }
}

pub mod recorder {
    use enzovu::middleware::{from_fn, Middleware};
    use enzovu::server::{handler, Handler, Request, Response};
    use std::sync::{Arc, Mutex};

    /// Shared event log written by recording middleware and handlers.
    #[derive(Clone, Default)]
    pub struct Events(Arc<Mutex<Vec<String>>>);

    impl Events {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, event: impl Into<String>) {
            self.0.lock().unwrap().push(event.into());
        }

        pub fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    /// Middleware that logs `pre:<name>` before and `post:<name>` after its inner handler.
    pub fn recording(events: &Events, name: &'static str) -> Arc<dyn Middleware> {
        let events = events.clone();
        from_fn(move |next: Handler| {
            let events = events.clone();
            Arc::new(move |res: &mut Response, req: &Request| {
                events.push(format!("pre:{name}"));
                next(res, req);
                events.push(format!("post:{name}"));
            }) as Handler
        })
    }

    /// Handler that logs `handler:<name>` and answers with `name` as text.
    pub fn recording_handler(events: &Events, name: &'static str) -> Handler {
        let events = events.clone();
        handler(move |res: &mut Response, _req: &Request| {
            events.push(format!("handler:{name}"));
            res.text(name);
        })
    }
}

pub mod test_server {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}
