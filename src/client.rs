//! Blocking client for a running Ingen server.

use crate::config::ClientConfig;
use crate::message::Request;
use crate::model::Graph;
use crate::prefix::PrefixRegistry;
use crate::resolver::ErrorResolver;
use crate::store::LocalModel;
use crate::transport::Transport;
use crate::{response, Result};
use tracing::debug;

/// Mutations understood by an Ingen engine.
pub trait Interface {
    fn put(&mut self, subject: &str, body: &str) -> Result<Graph>;

    fn set(&mut self, subject: &str, property: &str, value: &str) -> Result<Graph>;

    fn connect(&mut self, tail: &str, head: &str) -> Result<Graph>;

    fn disconnect(&mut self, tail: &str, head: &str) -> Result<Graph>;

    fn delete(&mut self, subject: &str) -> Result<Graph>;
}

/// A connection to an Ingen server plus the client's mirror of its graph.
///
/// Calls are strictly sequential: each one sends a request and blocks until
/// the reply has been applied.
#[derive(Debug)]
pub struct Remote {
    transport: Transport,
    server_base: String,
    prefixes: PrefixRegistry,
    resolver: ErrorResolver,
    model: LocalModel,
}

impl Remote {
    /// Connect to `uri`, looking up error descriptions from the environment.
    pub fn connect_to(uri: &str) -> Result<Self> {
        let config = ClientConfig {
            uri: uri.to_string(),
            ..ClientConfig::from_env()
        };
        Self::with_config(&config)
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let resolver = ErrorResolver::load(config.find_bundle().as_deref());
        Self::with_resolver(&config.uri, resolver)
    }

    pub fn with_resolver(uri: &str, resolver: ErrorResolver) -> Result<Self> {
        let transport = Transport::connect(uri)?;
        let server_base = format!("{}/", uri);
        debug!(endpoint = ?transport.endpoint(), %server_base, "remote ready");
        Ok(Self {
            transport,
            prefixes: PrefixRegistry::with_defaults(&server_base),
            server_base,
            resolver,
            model: LocalModel::new(),
        })
    }

    pub fn model(&self) -> &LocalModel {
        &self.model
    }

    pub fn prefixes(&self) -> &PrefixRegistry {
        &self.prefixes
    }

    /// The connection URI with a trailing slash, bound as the `server` prefix.
    pub fn server_base(&self) -> &str {
        &self.server_base
    }

    /// Strip the server base from `uri`, if present.
    pub fn uri_to_path<'a>(&self, uri: &'a str) -> &'a str {
        uri.strip_prefix(self.server_base.as_str()).unwrap_or(uri)
    }

    /// Send `request`, wait for the reply and apply it to the model.
    pub fn call(&mut self, request: &Request) -> Result<Graph> {
        let msg = request.encode(&self.prefixes);
        debug!(kind = ?request.msg_type(), "sending request");

        self.transport.send(&msg)?;
        let reply = self.transport.receive()?;

        response::process(
            &reply,
            &msg,
            &mut self.prefixes,
            &self.resolver,
            &mut self.model,
        )
    }

    pub fn get(&mut self, subject: &str) -> Result<Graph> {
        self.call(&Request::Get {
            subject: subject.to_string(),
        })
    }

    pub fn put(&mut self, subject: &str, body: &str) -> Result<Graph> {
        self.call(&Request::Put {
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    pub fn patch(&mut self, subject: &str, remove: &str, add: &str) -> Result<Graph> {
        self.call(&Request::Patch {
            subject: subject.to_string(),
            remove: remove.to_string(),
            add: add.to_string(),
        })
    }

    pub fn set(&mut self, subject: &str, property: &str, value: &str) -> Result<Graph> {
        self.call(&Request::Set {
            subject: subject.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        })
    }

    pub fn connect(&mut self, tail: &str, head: &str) -> Result<Graph> {
        self.call(&Request::connect(tail, head))
    }

    pub fn disconnect(&mut self, tail: &str, head: &str) -> Result<Graph> {
        self.call(&Request::Disconnect {
            tail: tail.to_string(),
            head: head.to_string(),
        })
    }

    pub fn delete(&mut self, subject: &str) -> Result<Graph> {
        self.call(&Request::Delete {
            subject: subject.to_string(),
        })
    }

    /// Close the connection. Later calls fail with a transport error.
    pub fn close(&mut self) {
        self.transport.close();
    }
}

impl Interface for Remote {
    fn put(&mut self, subject: &str, body: &str) -> Result<Graph> {
        Remote::put(self, subject, body)
    }

    fn set(&mut self, subject: &str, property: &str, value: &str) -> Result<Graph> {
        Remote::set(self, subject, property, value)
    }

    fn connect(&mut self, tail: &str, head: &str) -> Result<Graph> {
        Remote::connect(self, tail, head)
    }

    fn disconnect(&mut self, tail: &str, head: &str) -> Result<Graph> {
        Remote::disconnect(self, tail, head)
    }

    fn delete(&mut self, subject: &str) -> Result<Graph> {
        Remote::delete(self, subject)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::model::{Term, Triple};
    use crate::ns::vocab;
    use crate::transport::TERMINATOR;
    use crate::{turtle, Error};
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::UnixListener;
    use std::thread::{self, JoinHandle};

    const OK: &str = "[] a patch:Response ; patch:body 0 .\n";

    /// Serve one connection, answering each request with the next reply.
    fn serve(replies: Vec<String>) -> (tempfile::TempDir, String, JoinHandle<Vec<String>>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingen.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut requests = Vec::new();
            for reply in replies {
                let mut buf = Vec::new();
                if reader.read_until(TERMINATOR, &mut buf).unwrap() == 0 {
                    break;
                }
                buf.pop();
                requests.push(String::from_utf8(buf).unwrap());

                let stream = reader.get_mut();
                stream.write_all(reply.as_bytes()).unwrap();
                stream.write_all(&[TERMINATOR]).unwrap();
            }
            requests
        });

        (dir, format!("unix://{}", path.display()), handle)
    }

    fn remote(uri: &str) -> Remote {
        Remote::with_resolver(uri, ErrorResolver::empty()).unwrap()
    }

    #[test]
    fn test_get_scenario() {
        let reply = format!(
            "{}[] a patch:Put ; patch:subject <ingen:/root/main> ; patch:body [ a ingen:Graph ] .\n",
            OK
        );
        let (_dir, uri, server) = serve(vec![reply]);
        let mut remote = remote(&uri);

        let payload = remote.get("ingen:/root/main").unwrap();
        assert_eq!(payload.len(), 4);
        assert_eq!(
            remote.model().graph().iter().collect::<Vec<_>>(),
            vec![&Triple::new(
                Term::iri("ingen:/root/main"),
                vocab::RDF_TYPE,
                Term::iri(vocab::INGEN_GRAPH),
            )]
        );

        let requests = server.join().unwrap();
        let sent = turtle::parse(&requests[0], "ingen:/").unwrap();
        assert_eq!(sent.len(), 2);
        let envelope = &sent.iter().next().unwrap().subject;
        assert!(envelope.is_blank());
        assert_eq!(
            sent.value(envelope, vocab::PATCH_SUBJECT),
            Some(&Term::iri("ingen:/root/main"))
        );
    }

    #[test]
    fn test_put_then_get_reads_back() {
        let body = "a ingen:Block ;\n\t\tingen:polyphonic true";
        let echo = format!(
            "{}[] a patch:Put ; patch:subject <ingen:/root/main/osc> ; patch:body [ {} ] .\n",
            OK, body
        );
        let (_dir, uri, server) = serve(vec![OK.to_string(), echo]);
        let mut remote = remote(&uri);

        remote.put("ingen:/root/main/osc", body).unwrap();
        let payload = remote.get("ingen:/root/main/osc").unwrap();
        assert!(!payload.is_empty());

        let osc = Term::iri("ingen:/root/main/osc");
        let facts: Vec<_> = remote.model().describe(&osc).collect();
        assert_eq!(facts.len(), 2);
        assert!(facts
            .iter()
            .any(|t| t.object == Term::iri("http://drobilla.net/ns/ingen#Block")));

        let requests = server.join().unwrap();
        assert!(requests[0].contains("a patch:Put"));
        assert!(requests[0].contains(body));
        assert!(requests[1].contains("a patch:Get"));
    }

    #[test]
    fn test_failed_call_reports_request() {
        let (_dir, uri, server) = serve(vec![
            "[] a patch:Response ; patch:body 8 .\n".to_string(),
        ]);
        let mut remote = remote(&uri);

        let err = remote.delete("ingen:/root/missing").unwrap_err();
        match &err {
            Error::Application { code, cause, .. } => {
                assert_eq!(*code, 8);
                assert!(cause.contains("a patch:Delete"));
                assert!(cause.contains("<ingen:/root/missing>"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(remote.model().graph().is_empty());
        server.join().unwrap();
    }

    #[test]
    fn test_interface_sends_connect_sugar() {
        fn wire(iface: &mut impl Interface) -> Result<Graph> {
            iface.connect("ingen:/root/a/b/out", "ingen:/root/a/c/in")
        }

        let (_dir, uri, server) = serve(vec![OK.to_string()]);
        let mut remote = remote(&uri);
        wire(&mut remote).unwrap();

        let requests = server.join().unwrap();
        assert!(requests[0].contains("patch:subject <ingen:/root/a/>"));
        assert!(requests[0].contains("a ingen:Arc"));
    }

    #[test]
    fn test_closed_remote_fails_with_transport_error() {
        let (_dir, uri, server) = serve(vec![]);
        let mut remote = remote(&uri);
        assert_eq!(remote.server_base(), format!("{}/", uri));
        assert_eq!(
            remote.uri_to_path(&format!("{}/root/main", uri)),
            "root/main"
        );
        assert_eq!(remote.uri_to_path("ingen:/root"), "ingen:/root");
        assert_eq!(remote.prefixes().get("server"), Some(remote.server_base()));

        remote.close();
        assert!(matches!(
            remote.get("ingen:/root"),
            Err(Error::Transport { .. })
        ));
        server.join().unwrap();
    }
}
