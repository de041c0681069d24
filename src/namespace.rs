use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::http_utils::{AdminClient, Service};

//////////////////////////////////////////// NamespaceName ////////////////////////////////////////////

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-=:.\w]+$").expect("name pattern compiles"));

/// Error returned when a namespace name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceNameParseError {
    /// No name was given.
    Empty,
    /// The name is neither `tenant/namespace` nor `tenant/cluster/namespace`.
    InvalidFormat(String),
    /// The tenant or the namespace segment is empty.
    EmptySegment {
        /// The tenant segment as given.
        tenant: String,
        /// The namespace segment as given.
        namespace: String,
    },
    /// A segment contains characters outside `[-=:.\w]`.
    UnsupportedCharacters {
        /// Which segment failed: "tenant", "cluster" or "namespace".
        segment: &'static str,
        /// The offending segment.
        value: String,
    },
}

impl Display for NamespaceNameParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Empty => write!(f, "the namespace complete name is empty"),
            Self::InvalidFormat(name) => write!(
                f,
                "the complete name of namespace is invalid. complete name : [{}]",
                name
            ),
            Self::EmptySegment { tenant, namespace } => {
                write!(f, "invalid tenant or namespace. [{}/{}]", tenant, namespace)
            }
            Self::UnsupportedCharacters { segment, value } => write!(
                f,
                "{} name include unsupported special chars. {} : [{}]",
                segment, segment, value
            ),
        }
    }
}

impl std::error::Error for NamespaceNameParseError {}

/// A fully qualified namespace, either `tenant/namespace` or the legacy
/// `tenant/cluster/namespace` form.
///
/// ```rust
/// use pulsarctl::NamespaceName;
///
/// let ns: NamespaceName = "public/default".parse().unwrap();
/// assert_eq!(ns.tenant(), "public");
/// assert_eq!(ns.to_string(), "public/default");
///
/// assert!("public".parse::<NamespaceName>().is_err());
/// assert!("public/def ault".parse::<NamespaceName>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName {
    tenant: String,
    cluster: Option<String>,
    namespace: String,
}

impl NamespaceName {
    /// Builds a `tenant/namespace` name after validating both segments.
    pub fn new(
        tenant: impl Into<String>,
        namespace: impl Into<String>,
    ) -> std::result::Result<Self, NamespaceNameParseError> {
        let tenant = tenant.into();
        let namespace = namespace.into();
        validate_segments(&tenant, None, &namespace)?;
        Ok(Self {
            tenant,
            cluster: None,
            namespace,
        })
    }

    /// Returns the tenant segment.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Returns the cluster segment of a legacy name.
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Returns the local namespace segment.
    pub fn local_name(&self) -> &str {
        &self.namespace
    }

    /// True for the legacy `tenant/cluster/namespace` form.
    pub fn is_v1(&self) -> bool {
        self.cluster.is_some()
    }

    /// The admin resource path of this namespace.
    ///
    /// v2 names live under `/admin/v2/namespaces`, legacy names under `/admin/namespaces`.
    pub fn admin_path(&self) -> String {
        if self.is_v1() {
            format!("/admin/namespaces/{}", self)
        } else {
            format!("/admin/v2/namespaces/{}", self)
        }
    }
}

fn validate_segments(
    tenant: &str,
    cluster: Option<&str>,
    namespace: &str,
) -> std::result::Result<(), NamespaceNameParseError> {
    if tenant.is_empty() || namespace.is_empty() || cluster.is_some_and(str::is_empty) {
        return Err(NamespaceNameParseError::EmptySegment {
            tenant: tenant.to_string(),
            namespace: namespace.to_string(),
        });
    }
    let segments = [
        ("tenant", Some(tenant)),
        ("cluster", cluster),
        ("namespace", Some(namespace)),
    ];
    for (segment, value) in segments {
        let Some(value) = value else {
            continue;
        };
        if !NAME_PATTERN.is_match(value) {
            return Err(NamespaceNameParseError::UnsupportedCharacters {
                segment,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

impl Display for NamespaceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.cluster {
            Some(cluster) => write!(f, "{}/{}/{}", self.tenant, cluster, self.namespace),
            None => write!(f, "{}/{}", self.tenant, self.namespace),
        }
    }
}

impl FromStr for NamespaceName {
    type Err = NamespaceNameParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NamespaceNameParseError::Empty);
        }
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [tenant, namespace] => NamespaceName::new(*tenant, *namespace),
            [tenant, cluster, namespace] => {
                validate_segments(tenant, Some(cluster), namespace)?;
                Ok(NamespaceName {
                    tenant: tenant.to_string(),
                    cluster: Some(cluster.to_string()),
                    namespace: namespace.to_string(),
                })
            }
            _ => Err(NamespaceNameParseError::InvalidFormat(s.to_string())),
        }
    }
}

///////////////////////////////////////////// DispatchRate ////////////////////////////////////////////

/// Message dispatch throttling applied to a namespace.
///
/// A rate of `-1` disables throttling on that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchRate {
    /// Messages dispatched per period.
    pub dispatch_throttling_rate_in_msg: i32,
    /// Bytes dispatched per period.
    pub dispatch_throttling_rate_in_byte: i64,
    /// Length of the throttling period in seconds.
    pub rate_period_in_second: i32,
    /// Whether the rate is relative to the publish rate.
    pub relative_to_publish_rate: bool,
}

impl Default for DispatchRate {
    fn default() -> Self {
        Self {
            dispatch_throttling_rate_in_msg: -1,
            dispatch_throttling_rate_in_byte: -1,
            rate_period_in_second: 1,
            relative_to_publish_rate: false,
        }
    }
}

/// The three dispatch rate policies a namespace carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRateKind {
    /// Default rate for topics in the namespace.
    Topic,
    /// Default rate for subscriptions in the namespace.
    Subscription,
    /// Default rate for geo-replicators in the namespace.
    Replicator,
}

impl DispatchRateKind {
    /// The policy's path suffix below the namespace resource.
    pub fn path_suffix(self) -> &'static str {
        match self {
            Self::Topic => "dispatchRate",
            Self::Subscription => "subscriptionDispatchRate",
            Self::Replicator => "replicatorDispatchRate",
        }
    }

    /// Human-readable name used in help text and success messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Topic => "message dispatch rate",
            Self::Subscription => "subscription message dispatch rate",
            Self::Replicator => "replicator message dispatch rate",
        }
    }
}

////////////////////////////////////////////// Namespaces /////////////////////////////////////////////

/// Namespace policy operations on the admin endpoint.
pub struct Namespaces<'a> {
    client: &'a AdminClient,
}

impl<'a> Namespaces<'a> {
    pub(crate) fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    /// Gets the default replicator message dispatch rate of a namespace.
    pub async fn get_replicator_dispatch_rate(
        &self,
        namespace: &NamespaceName,
    ) -> Result<Option<DispatchRate>> {
        self.get_rate(namespace, DispatchRateKind::Replicator).await
    }

    /// Sets the default replicator message dispatch rate of a namespace.
    pub async fn set_replicator_dispatch_rate(
        &self,
        namespace: &NamespaceName,
        rate: &DispatchRate,
    ) -> Result<()> {
        self.set_rate(namespace, DispatchRateKind::Replicator, rate)
            .await
    }

    /// Removes the replicator message dispatch rate policy of a namespace.
    pub async fn remove_replicator_dispatch_rate(&self, namespace: &NamespaceName) -> Result<()> {
        let url = self.rate_url(namespace, DispatchRateKind::Replicator)?;
        self.client.delete(url).await
    }

    /// Gets the default message dispatch rate of a namespace.
    pub async fn get_dispatch_rate(
        &self,
        namespace: &NamespaceName,
    ) -> Result<Option<DispatchRate>> {
        self.get_rate(namespace, DispatchRateKind::Topic).await
    }

    /// Sets the default message dispatch rate of a namespace.
    pub async fn set_dispatch_rate(
        &self,
        namespace: &NamespaceName,
        rate: &DispatchRate,
    ) -> Result<()> {
        self.set_rate(namespace, DispatchRateKind::Topic, rate).await
    }

    /// Gets the default subscription message dispatch rate of a namespace.
    pub async fn get_subscription_dispatch_rate(
        &self,
        namespace: &NamespaceName,
    ) -> Result<Option<DispatchRate>> {
        self.get_rate(namespace, DispatchRateKind::Subscription)
            .await
    }

    /// Sets the default subscription message dispatch rate of a namespace.
    pub async fn set_subscription_dispatch_rate(
        &self,
        namespace: &NamespaceName,
        rate: &DispatchRate,
    ) -> Result<()> {
        self.set_rate(namespace, DispatchRateKind::Subscription, rate)
            .await
    }

    async fn get_rate(
        &self,
        namespace: &NamespaceName,
        kind: DispatchRateKind,
    ) -> Result<Option<DispatchRate>> {
        let url = self.rate_url(namespace, kind)?;
        self.client.get_optional(url).await
    }

    async fn set_rate(
        &self,
        namespace: &NamespaceName,
        kind: DispatchRateKind,
        rate: &DispatchRate,
    ) -> Result<()> {
        let url = self.rate_url(namespace, kind)?;
        self.client.post(url, rate).await
    }

    fn rate_url(&self, namespace: &NamespaceName, kind: DispatchRateKind) -> Result<url::Url> {
        let path = format!("{}/{}", namespace.admin_path(), kind.path_suffix());
        self.client.endpoint(Service::Admin, &path, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_v2_name() {
        let ns: NamespaceName = "public/default".parse().unwrap();
        assert_eq!(ns.tenant(), "public");
        assert_eq!(ns.cluster(), None);
        assert_eq!(ns.local_name(), "default");
        assert!(!ns.is_v1());
        assert_eq!(ns.admin_path(), "/admin/v2/namespaces/public/default");
    }

    #[test]
    fn parses_v1_name() {
        let ns: NamespaceName = "sample/us-west/ns1".parse().unwrap();
        assert_eq!(ns.cluster(), Some("us-west"));
        assert!(ns.is_v1());
        assert_eq!(ns.to_string(), "sample/us-west/ns1");
        assert_eq!(ns.admin_path(), "/admin/namespaces/sample/us-west/ns1");
    }

    #[test]
    fn accepts_special_characters_in_pattern() {
        assert!("my-tenant/ns.with:colons=eq_1".parse::<NamespaceName>().is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(
            "".parse::<NamespaceName>(),
            Err(NamespaceNameParseError::Empty)
        );
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let err = "public".parse::<NamespaceName>().unwrap_err();
        assert_eq!(
            err,
            NamespaceNameParseError::InvalidFormat("public".to_string())
        );
        assert!("a/b/c/d".parse::<NamespaceName>().is_err());
    }

    #[test]
    fn rejects_empty_segment() {
        let err = "public/".parse::<NamespaceName>().unwrap_err();
        assert_eq!(err.to_string(), "invalid tenant or namespace. [public/]");
        assert!("a//b".parse::<NamespaceName>().is_err());
    }

    #[test]
    fn rejects_unsupported_characters() {
        let err = "pub lic/default".parse::<NamespaceName>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "tenant name include unsupported special chars. tenant : [pub lic]"
        );
        let err = "public/def#ault".parse::<NamespaceName>().unwrap_err();
        assert!(matches!(
            err,
            NamespaceNameParseError::UnsupportedCharacters {
                segment: "namespace",
                ..
            }
        ));
    }

    #[test]
    fn dispatch_rate_defaults_fill_missing_fields() {
        let rate: DispatchRate =
            serde_json::from_str(r#"{"dispatchThrottlingRateInMsg": 100}"#).unwrap();
        assert_eq!(rate.dispatch_throttling_rate_in_msg, 100);
        assert_eq!(rate.dispatch_throttling_rate_in_byte, -1);
        assert_eq!(rate.rate_period_in_second, 1);
        assert!(!rate.relative_to_publish_rate);
    }

    #[test]
    fn dispatch_rate_serializes_camel_case() {
        let value = serde_json::to_value(DispatchRate::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "dispatchThrottlingRateInMsg": -1,
                "dispatchThrottlingRateInByte": -1,
                "ratePeriodInSecond": 1,
                "relativeToPublishRate": false
            })
        );
    }
}
