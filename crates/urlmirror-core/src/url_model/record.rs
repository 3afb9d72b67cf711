//! The canonical URL record and its string forms.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::codec::{encode, UnsafeSet};
use super::scheme::Scheme;
use crate::mapper::HostAliasResolver;

/// FTP transfer type selected by a trailing `;type=X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FtpType {
    Ascii,
    Image,
}

impl FtpType {
    /// Type code as sent in an FTP `TYPE` command.
    pub fn code(self) -> char {
        match self {
            FtpType::Ascii => 'A',
            FtpType::Image => 'I',
        }
    }
}

/// A parsed, canonical URL.
///
/// Components are stored percent-decoded. The request path and the canonical
/// string are derived from them and recomputed by [`refresh`](Self::refresh)
/// whenever a component changes, so they are never stale. Two records denote
/// the same resource iff their canonical strings are equal.
#[derive(Debug, Clone)]
pub struct UrlRecord {
    scheme: Scheme,
    host: String,
    port: u16,
    user: Option<String>,
    password: Option<String>,
    dir: String,
    file: String,
    path: String,
    ftp_type: Option<FtpType>,
    unsafe_set: UnsafeSet,
    canonical: String,
    proxy: Option<Box<UrlRecord>>,
}

/// Decoded components handed over by the parser.
pub(super) struct Components {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dir: String,
    pub file: String,
    pub ftp_type: Option<FtpType>,
}

impl UrlRecord {
    pub(super) fn from_components(c: Components, unsafe_set: UnsafeSet) -> Self {
        let mut rec = UrlRecord {
            scheme: c.scheme,
            host: c.host,
            port: c.port,
            user: c.user,
            password: c.password,
            dir: c.dir,
            file: c.file,
            path: String::new(),
            ftp_type: c.ftp_type,
            unsafe_set,
            canonical: String::new(),
            proxy: None,
        };
        rec.refresh();
        rec
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Decoded, simplified directory. Empty for documents at the server root.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Decoded file name. Empty when the URL names a directory.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Re-encoded request path (`/dir/file`, or `%2F...` for FTP absolute dirs).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Transfer type; `None` for HTTP.
    pub fn ftp_type(&self) -> Option<FtpType> {
        self.ftp_type
    }

    pub fn unsafe_set(&self) -> UnsafeSet {
        self.unsafe_set
    }

    /// Canonical string with the password in clear.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Proxy this URL is fetched through, if any.
    pub fn proxy(&self) -> Option<&UrlRecord> {
        self.proxy.as_deref()
    }

    pub fn set_proxy(&mut self, proxy: Option<UrlRecord>) {
        self.proxy = proxy.map(Box::new);
    }

    /// Replaces the host and refreshes the derived strings.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
        self.refresh();
    }

    /// Replaces the host by its true name as reported by `resolver`.
    pub fn apply_host_alias(&mut self, resolver: &dyn HostAliasResolver) {
        let real = resolver.real_host(&self.host);
        if real != self.host {
            tracing::debug!(from = %self.host, to = %real, "host alias applied");
            self.set_host(real);
        }
    }

    /// Recomputes the request path and canonical string from the components.
    pub fn refresh(&mut self) {
        self.path = self.request_path();
        self.canonical = self.to_canonical_string(false);
    }

    fn is_ftp_absolute(&self) -> bool {
        self.scheme == Scheme::Ftp && self.dir.starts_with('/')
    }

    /// Encoded directory as written into a URL; an FTP absolute directory
    /// gets `%2F` in place of its leading slash.
    fn encoded_dir(&self) -> String {
        let dir = encode(&self.dir, self.unsafe_set);
        if self.is_ftp_absolute() {
            format!("%2F{}", &dir[1..])
        } else {
            dir
        }
    }

    fn request_path(&self) -> String {
        let dir = self.encoded_dir();
        let mut path = String::with_capacity(dir.len() + self.file.len() + 2);
        if !self.is_ftp_absolute() {
            path.push('/');
        }
        path.push_str(&dir);
        if !self.dir.is_empty() {
            path.push('/');
        }
        path.push_str(&encode(&self.file, self.unsafe_set));
        path
    }

    /// `scheme://[user[:password]@]host:port/[dir/]file`, each component
    /// percent-encoded. With `hide_password` the password becomes a run of
    /// `x` of the same length.
    pub fn to_canonical_string(&self, hide_password: bool) -> String {
        let set = self.unsafe_set;
        let mut s = String::with_capacity(self.host.len() + self.dir.len() + self.file.len() + 24);
        s.push_str(self.scheme.prefix());
        if let Some(user) = &self.user {
            s.push_str(&encode(user, set));
            if let Some(password) = &self.password {
                let password = encode(password, set);
                s.push(':');
                if hide_password {
                    s.extend(std::iter::repeat('x').take(password.len()));
                } else {
                    s.push_str(&password);
                }
            }
            s.push('@');
        }
        s.push_str(&encode(&self.host, set));
        s.push(':');
        s.push_str(&self.port.to_string());
        s.push('/');
        s.push_str(&self.encoded_dir());
        if !self.dir.is_empty() {
            s.push('/');
        }
        s.push_str(&encode(&self.file, set));
        s
    }
}

impl PartialEq for UrlRecord {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for UrlRecord {}

impl Hash for UrlRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

/// Displays the canonical string with the password masked, for logs.
impl fmt::Display for UrlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string(true))
    }
}
