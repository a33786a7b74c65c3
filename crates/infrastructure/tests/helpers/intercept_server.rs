use dns_intercept_application::ports::DnsHandler;
use dns_intercept_application::use_cases::{InterceptQueryUseCase, TerminalHandler};
use dns_intercept_domain::{parse_directives, ResponseCode};
use dns_intercept_infrastructure::dns::DnsServerHandler;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_server::ServerFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// UDP server on an ephemeral loopback port answering from `rules`, with
/// unmatched queries ending at a terminal handler returning `fallthrough`.
pub struct InterceptServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl InterceptServer {
    pub async fn start(rules: &str, fallthrough: ResponseCode) -> Self {
        let table = parse_directives(rules, &[]).unwrap();
        let next: Arc<dyn DnsHandler> = Arc::new(TerminalHandler::new(fallthrough));
        let chain: Arc<dyn DnsHandler> = Arc::new(InterceptQueryUseCase::new(Arc::new(table), next));

        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();

        let mut server = ServerFuture::new(DnsServerHandler::new(chain));
        server.register_socket(socket);
        let task = tokio::spawn(async move {
            let _ = server.block_until_done().await;
        });

        Self { addr, task }
    }

    pub async fn query(&self, name: &str, record_type: RecordType, class: DNSClass) -> Message {
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut query = Query::query(Name::from_ascii(name).unwrap(), record_type);
        query.set_query_class(class);

        let mut message = Message::new();
        message
            .set_id(4242)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .add_query(query);

        client
            .send_to(&message.to_vec().unwrap(), self.addr)
            .await
            .unwrap();

        let mut buf = vec![0u8; 4096];
        let (len, _) = tokio::time::timeout(Duration::from_secs(3), client.recv_from(&mut buf))
            .await
            .expect("no reply from server")
            .unwrap();
        Message::from_vec(&buf[..len]).unwrap()
    }
}

impl Drop for InterceptServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
