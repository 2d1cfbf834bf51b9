use dotenvy::dotenv;
use embhttp::client::{Client, Method, Request};
use embhttp::transport::{Close, Connection, Read, Write};
use std::env;
use std::io::{Read as StdRead, Write as StdWrite};
use std::net::TcpStream;

struct NetConnection {
    stream: TcpStream,
}

impl Read for NetConnection {
    type Error = embhttp::Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream.read(buf).map_err(|_| embhttp::Error::ReadError)
    }
}

impl Write for NetConnection {
    type Error = embhttp::Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream
            .write(buf)
            .map_err(|_| embhttp::Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream
            .flush()
            .map_err(|_| embhttp::Error::WriteError)
    }
}

impl Close for NetConnection {
    type Error = embhttp::Error;
    fn close(self) -> Result<(), Self::Error> {
        self.stream.shutdown(std::net::Shutdown::Both).unwrap();
        Ok(())
    }
}

impl Connection for NetConnection {}

#[test]
#[ignore = "requires network access"]
fn test_http_get() {
    dotenv().ok();
    let address = env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org:80".to_string());
    let host = address.split(':').next().unwrap().to_string();
    let stream = TcpStream::connect(address.as_str()).expect("Failed to connect to server");
    stream
        .set_read_timeout(Some(std::time::Duration::from_secs(5)))
        .unwrap();
    let conn = NetConnection { stream };
    let mut client = Client::new(conn);

    let request = Request {
        method: Method::Get,
        host: host.as_str(),
        path: "/get",
        headers: heapless::Vec::new(),
        body: None,
    };

    let response = client.request(&request);
    assert!(response.is_ok());
    let response = response.unwrap();
    assert_eq!(response.status_code, 200);
    assert!(client.keep_alive());
}
