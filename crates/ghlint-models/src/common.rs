//! Models and deserialization helpers shared across document kinds.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use self_cell::self_cell;
use serde::{Deserialize, Deserializer, Serialize, de};

/// A `permissions:` block on a workflow or job.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Permissions {
    /// Blanket permissions, e.g. `permissions: read-all`.
    Base(BasePermission),
    /// Per-capability permissions, keyed by their document names
    /// (e.g. `pull-requests`).
    ///
    /// Kept as an open mapping so that unknown capabilities survive
    /// deserialization and can be reported on by consumers.
    Explicit(IndexMap<String, Permission>),
}

impl Default for Permissions {
    fn default() -> Self {
        Self::Base(BasePermission::Default)
    }
}

/// A blanket permission setting.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum BasePermission {
    /// No `permissions:` were given; GitHub applies the repository default.
    #[default]
    Default,
    /// `read-all`.
    ReadAll,
    /// `write-all`.
    WriteAll,
}

/// A single capability's access level.
#[derive(Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// `read`
    Read,
    /// `write`
    Write,
    /// `none`
    #[default]
    None,
}

/// An `env:`, `with:` or `secrets:` mapping.
pub type Env = IndexMap<String, EnvValue>;

/// A value inside an [`Env`].
///
/// GitHub stringifies these before use, but documents are free to spell
/// them as numbers or booleans.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum EnvValue {
    /// A string value. A missing value (`foo:`) is the empty string.
    #[serde(deserialize_with = "null_to_default")]
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
}

impl Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// An `if:` condition.
///
/// Conditions are either literal booleans or expressions, with or without
/// the `${{ }}` fencing.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum If {
    /// `if: true` or `if: false`.
    Bool(bool),
    /// Any expression, fenced or bare.
    Expr(String),
}

/// Either a single `T` or a list of them, e.g. `needs: build` vs.
/// `needs: [build, test]`.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
enum SoV<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<SoV<T>> for Vec<T> {
    fn from(val: SoV<T>) -> Vec<T> {
        match val {
            SoV::One(v) => vec![v],
            SoV::Many(vs) => vs,
        }
    }
}

pub(crate) fn scalar_or_vector<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    SoV::deserialize(de).map(Into::into)
}

/// A bool or a string. GitHub reads `run: true` as the command `true`.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
enum BoS {
    Bool(bool),
    String(String),
}

impl From<BoS> for String {
    fn from(value: BoS) -> Self {
        match value {
            BoS::Bool(b) => b.to_string(),
            BoS::String(s) => s,
        }
    }
}

pub(crate) fn bool_is_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    BoS::deserialize(de).map(Into::into)
}

fn null_to_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let key = Option::<T>::deserialize(de)?;
    Ok(key.unwrap_or_default())
}

/// A `uses:` clause that couldn't be parsed.
#[derive(Debug, PartialEq)]
pub struct UsesError(String);

impl Display for UsesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed `uses` ref: {}", self.0)
    }
}

impl std::error::Error for UsesError {}

/// A parsed `uses:` clause.
#[derive(Debug, PartialEq)]
pub enum Uses {
    /// A path inside the current repository, e.g. `uses: ./.github/actions/foo`.
    Local(LocalUses),

    /// An action or reusable workflow in another repository,
    /// e.g. `uses: actions/checkout@v4`.
    Repository(RepositoryUses),

    /// A container image, e.g. `uses: docker://alpine:3.8`.
    Docker(DockerUses),

    /// A clause that only has a shape once expressions are evaluated,
    /// e.g. `uses: ${{ matrix.action }}`. Kept verbatim.
    Expression(String),
}

impl Uses {
    /// Parse a `uses:` clause into its variant.
    ///
    /// Clauses that don't parse as a repository reference but contain a
    /// `${{` expression become [`Uses::Expression`] instead of an error.
    pub fn parse(uses: impl Into<String>) -> Result<Self, UsesError> {
        let uses = uses.into();

        if uses.starts_with("./") {
            Ok(Self::Local(LocalUses { path: uses }))
        } else if let Some(image) = uses.strip_prefix("docker://") {
            DockerUses::parse(image).map(Self::Docker)
        } else if uses.contains("${{") && RepositoryUsesInner::from_str(&uses).is_err() {
            Ok(Self::Expression(uses))
        } else {
            RepositoryUses::parse(uses).map(Self::Repository)
        }
    }

    /// The clause exactly as written, including any `docker://` prefix.
    pub fn raw(&self) -> String {
        match self {
            Uses::Local(local) => local.path.clone(),
            Uses::Repository(repo) => repo.raw().to_string(),
            Uses::Docker(docker) => format!("docker://{}", docker.raw()),
            Uses::Expression(raw) => raw.clone(),
        }
    }
}

impl Display for Uses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// A `uses: ./some/path` clause.
#[derive(Debug, PartialEq)]
#[non_exhaustive]
pub struct LocalUses {
    /// The path as written, including the leading `./`.
    pub path: String,
}

impl LocalUses {
    /// The path relative to the repository root, i.e. without the leading `./`.
    pub fn relative_path(&self) -> &str {
        self.path.strip_prefix("./").unwrap_or(&self.path)
    }
}

#[derive(Debug, PartialEq)]
struct RepositoryUsesInner<'a> {
    owner: &'a str,
    repo: &'a str,
    subpath: Option<&'a str>,
    git_ref: &'a str,
}

impl<'a> RepositoryUsesInner<'a> {
    fn from_str(uses: &'a str) -> Result<Self, UsesError> {
        // Paths may legally contain `@`, but GitHub rejects any clause with
        // more than one, so the last `@` always starts the ref.
        let Some((path, git_ref)) = uses.rsplit_once('@') else {
            return Err(UsesError(format!("missing `@<ref>` in {uses}")));
        };

        let mut components = path.splitn(3, '/');
        match (components.next(), components.next()) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok(RepositoryUsesInner {
                    owner,
                    repo,
                    subpath: components.next(),
                    git_ref,
                })
            }
            _ => Err(UsesError(format!("owner/repo slug is too short: {uses}"))),
        }
    }
}

self_cell!(
    /// A `uses: owner/repo[/subpath]@ref` clause.
    pub struct RepositoryUses {
        owner: String,

        #[covariant]
        dependent: RepositoryUsesInner,
    }

    impl {Debug, PartialEq}
);

impl RepositoryUses {
    /// Parse a repository `uses:` clause.
    pub fn parse(uses: impl Into<String>) -> Result<Self, UsesError> {
        RepositoryUses::try_new(uses.into(), |s| RepositoryUsesInner::from_str(s))
    }

    /// The clause as written.
    pub fn raw(&self) -> &str {
        self.borrow_owner()
    }

    /// The owning user or organization.
    pub fn owner(&self) -> &str {
        self.borrow_dependent().owner
    }

    /// The repository name.
    pub fn repo(&self) -> &str {
        self.borrow_dependent().repo
    }

    /// The path to the action or workflow inside the repository, if any.
    pub fn subpath(&self) -> Option<&str> {
        self.borrow_dependent().subpath
    }

    /// The branch, tag or commit after the `@`.
    pub fn git_ref(&self) -> &str {
        self.borrow_dependent().git_ref
    }
}

/// A `uses: docker://image` clause.
#[derive(Debug, PartialEq)]
pub struct DockerUses {
    reference: String,
}

impl DockerUses {
    /// Parse a docker reference, without its `docker://` prefix.
    pub fn parse(uses: impl Into<String>) -> Result<Self, UsesError> {
        let reference = uses.into();
        if reference.is_empty() {
            return Err(UsesError("empty docker image reference".into()));
        }

        Ok(Self { reference })
    }

    /// The reference as written, without the `docker://` prefix.
    pub fn raw(&self) -> &str {
        &self.reference
    }

    /// Splits off a leading registry host, which is the first component
    /// when it looks like a hostname.
    fn split_registry(&self) -> (Option<&str>, &str) {
        match self.reference.split_once('/') {
            Some((host, rest)) if host == "localhost" || host.contains(['.', ':']) => {
                (Some(host), rest)
            }
            _ => (None, &self.reference),
        }
    }

    /// The registry host, if one was given.
    pub fn registry(&self) -> Option<&str> {
        self.split_registry().0
    }

    /// The image name, without any tag or digest.
    pub fn image(&self) -> &str {
        let (_, name) = self.split_registry();
        name.split(['@', ':']).next().unwrap_or(name)
    }

    /// The image tag, if any. Digest references have none.
    pub fn tag(&self) -> Option<&str> {
        let (_, name) = self.split_registry();
        if name.contains('@') {
            return None;
        }

        name.split_once(':')
            .map(|(_, tag)| tag)
            .filter(|tag| !tag.is_empty())
    }
}

/// Builds a `de::Error::custom` and logs it, since untagged enums swallow
/// the errors of the variants they try.
pub(crate) fn custom_error<'de, D>(msg: impl Display) -> D::Error
where
    D: Deserializer<'de>,
{
    let msg = msg.to_string();
    tracing::error!(msg);
    de::Error::custom(msg)
}

/// Deserialize a step's `uses:`.
pub(crate) fn step_uses<'de, D>(de: D) -> Result<Uses, D::Error>
where
    D: Deserializer<'de>,
{
    let uses = <String>::deserialize(de)?;
    Uses::parse(uses).map_err(custom_error::<D>)
}

/// Deserialize a job's reusable workflow `uses:`.
pub(crate) fn reusable_step_uses<'de, D>(de: D) -> Result<Uses, D::Error>
where
    D: Deserializer<'de>,
{
    match step_uses(de)? {
        // `@` may appear in local action paths, but local reusable
        // workflows are always taken from the calling commit.
        Uses::Local(ref local) if local.path.contains('@') => Err(custom_error::<D>(
            "local reusable workflow reference can't specify `@<ref>`",
        )),
        Uses::Docker(_) => Err(custom_error::<D>(
            "docker action invalid in reusable workflow `uses`",
        )),
        uses => Ok(uses),
    }
}
