//! Request envelopes.
//!
//! Every request is a single anonymous node declaring one patch operation.
//! Caller-supplied bodies and values are pre-serialized Turtle and are
//! inserted verbatim.

use crate::ns::vocab;
use crate::prefix::PrefixRegistry;

/// Operation types of the patch protocol
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MsgType {
    Get,
    Put,
    Patch,
    Set,
    Delete,
    Response,
}

impl MsgType {
    pub fn uri(self) -> &'static str {
        match self {
            MsgType::Get => vocab::PATCH_GET,
            MsgType::Put => vocab::PATCH_PUT,
            MsgType::Patch => vocab::PATCH_PATCH,
            MsgType::Set => vocab::PATCH_SET,
            MsgType::Delete => vocab::PATCH_DELETE,
            MsgType::Response => vocab::PATCH_RESPONSE,
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            vocab::PATCH_GET => Some(MsgType::Get),
            vocab::PATCH_PUT => Some(MsgType::Put),
            vocab::PATCH_PATCH => Some(MsgType::Patch),
            vocab::PATCH_SET => Some(MsgType::Set),
            vocab::PATCH_DELETE => Some(MsgType::Delete),
            vocab::PATCH_RESPONSE => Some(MsgType::Response),
            _ => None,
        }
    }
}

/// A request to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Get {
        subject: String,
    },
    Put {
        subject: String,
        body: String,
    },
    Patch {
        subject: String,
        remove: String,
        add: String,
    },
    Set {
        subject: String,
        property: String,
        value: String,
    },
    /// Delete the object at `subject`.
    Delete {
        subject: String,
    },
    /// Delete the arc from `tail` to `head`.
    Disconnect {
        tail: String,
        head: String,
    },
}

impl Request {
    /// Put an arc from `tail` to `head` into their longest common prefix.
    pub fn connect(tail: &str, head: &str) -> Self {
        Request::Put {
            subject: common_prefix(tail, head).to_string(),
            body: arc_body(tail, head),
        }
    }

    pub fn msg_type(&self) -> MsgType {
        match self {
            Request::Get { .. } => MsgType::Get,
            Request::Put { .. } => MsgType::Put,
            Request::Patch { .. } => MsgType::Patch,
            Request::Set { .. } => MsgType::Set,
            Request::Delete { .. } | Request::Disconnect { .. } => MsgType::Delete,
        }
    }

    /// Render the envelope alone, without prefix declarations.
    pub fn envelope(&self) -> String {
        match self {
            Request::Get { subject } => format!(
                "[]\n\ta patch:Get ;\n\tpatch:subject <{}> .\n",
                subject
            ),
            Request::Put { subject, body } => format!(
                "[]\n\ta patch:Put ;\n\tpatch:subject <{}> ;\n\tpatch:body [\n{}\n\t] .\n",
                subject, body
            ),
            Request::Patch {
                subject,
                remove,
                add,
            } => format!(
                "[]\n\ta patch:Patch ;\n\tpatch:subject <{}> ;\n\tpatch:remove [\n{}\n\t] ;\n\tpatch:add [\n{}\n\t] .\n",
                subject, remove, add
            ),
            Request::Set {
                subject,
                property,
                value,
            } => format!(
                "[]\n\ta patch:Set ;\n\tpatch:subject <{}> ;\n\tpatch:property <{}> ;\n\tpatch:value {} .\n",
                subject, property, value
            ),
            Request::Delete { subject } => format!(
                "[]\n\ta patch:Delete ;\n\tpatch:subject <{}> .\n",
                subject
            ),
            Request::Disconnect { tail, head } => format!(
                "[]\n\ta patch:Delete ;\n\tpatch:body [\n{}\n\t] .\n",
                arc_body(tail, head)
            ),
        }
    }

    /// Render the full message: known prefixes followed by the envelope.
    pub fn encode(&self, prefixes: &PrefixRegistry) -> String {
        let mut msg = prefixes.prologue();
        msg.push('\n');
        msg.push_str(&self.envelope());
        msg
    }
}

fn arc_body(tail: &str, head: &str) -> String {
    format!(
        "\t\ta ingen:Arc ;\n\t\tingen:tail <{}> ;\n\t\tingen:head <{}>",
        tail, head
    )
}

/// Longest common leading substring of `a` and `b`, on character boundaries.
///
/// This is purely lexical: `/a/bc` and `/a/bd` share `/a/b`.
pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}
