//! Icon resolution for leaf resources.
//!
//! The layout core only needs to know whether a leaf type has an icon and
//! where it lives; it never reads the image. Resolution goes through the
//! [`IconResolver`] capability so callers can plug in their own lookup.
//!
//! [`IconRegistry`] is the filesystem-backed resolver. It is composed of one
//! [`IconPack`] per namespace, each built by scanning a directory of `.svg`
//! files once at construction. After that the registry is read-only and can
//! be shared across threads.
//!
//! Unlike [`TypeClassifier`](crate::classify::TypeClassifier), icon lookup
//! falls back to fuzzy substring matching. A wrong icon is cosmetic; a wrong
//! container classification is not.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info};

use crate::{config::IconConfig, error::ArborError};

/// Maps a resource type string to an optional icon path.
pub trait IconResolver: Send + Sync {
    fn resolve(&self, resource_type: &str) -> Option<PathBuf>;
}

/// A resolver that knows no icons. Every leaf renders as a placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconResolver for NoIcons {
    fn resolve(&self, _resource_type: &str) -> Option<PathBuf> {
        None
    }
}

/// Short names for the Azure icon set.
const AZURE_ALIASES: &[(&str, &str)] = &[
    ("vm", "virtual-machines"),
    ("vnet", "virtual-networks"),
    ("aks", "kubernetes-services"),
    ("app-service", "app-services"),
    ("nsg", "network-security-groups"),
    ("lb", "load-balancers"),
    ("agw", "application-gateways"),
    ("func", "function-apps"),
    ("kv", "key-vaults"),
    ("acr", "container-registries"),
    ("apim", "api-management-services"),
    ("storage", "storage-accounts"),
    ("cosmos", "azure-cosmos-db"),
    ("redis", "cache-redis"),
    ("frontdoor", "front-doors"),
    ("law", "log-analytics-workspaces"),
    ("adf", "data-factory"),
    ("resource-group", "resource-groups"),
    ("subnet", "subnets-with-delegation"),
    ("subscription", "subscriptions"),
];

/// Normalizes an icon file name into a lookup key.
///
/// `"10021-icon-service-Virtual Machines.svg"` becomes `"virtual-machines"`.
pub fn normalize_icon_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".svg")
        .or_else(|| file_name.strip_suffix(".SVG"))
        .unwrap_or(file_name);
    strip_service_prefix(stem).to_lowercase().replace(' ', "-")
}

/// Strips a leading `<digits>-icon-service-` (case-insensitive).
fn strip_service_prefix(name: &str) -> &str {
    const MARKER: &str = "-icon-service-";

    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return name;
    }
    let rest = &name[digits..];
    match rest.get(..MARKER.len()) {
        Some(head) if head.eq_ignore_ascii_case(MARKER) => &rest[MARKER.len()..],
        _ => name,
    }
}

/// The icons of a single namespace, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct IconPack {
    namespace: String,
    icons: BTreeMap<String, PathBuf>,
    aliases: HashMap<String, String>,
}

impl IconPack {
    /// Creates an empty pack. The `azure` namespace gets its built-in aliases.
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into().to_lowercase();
        let aliases = if namespace == "azure" {
            AZURE_ALIASES
                .iter()
                .map(|(alias, target)| (alias.to_string(), target.to_string()))
                .collect()
        } else {
            HashMap::new()
        };
        Self {
            namespace,
            icons: BTreeMap::new(),
            aliases,
        }
    }

    /// Builds a pack from every `.svg` file directly inside `dir`.
    ///
    /// A missing directory yields an empty pack.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Io`] if the directory exists but cannot be read.
    pub fn from_dir(namespace: impl Into<String>, dir: &Path) -> Result<Self, ArborError> {
        let mut pack = Self::new(namespace);
        if !dir.is_dir() {
            debug!(namespace = pack.namespace.as_str(), dir:? = dir; "Icon directory not found");
            return Ok(pack);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_svg = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
            if !is_svg {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let key = normalize_icon_name(file_name);
                pack.icons.insert(key, path.clone());
            }
        }

        info!(namespace = pack.namespace.as_str(), icons = pack.icons.len(); "Loaded icon pack");
        Ok(pack)
    }

    pub fn with_icon(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.icons.insert(normalize_icon_name(name), path.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Resolves a key without its namespace: alias, then exact, then fuzzy.
    pub fn resolve(&self, key: &str) -> Option<&Path> {
        let key = key.to_lowercase();
        if key.is_empty() {
            return None;
        }
        let key = self.aliases.get(&key).cloned().unwrap_or(key);

        if let Some(path) = self.icons.get(&key) {
            return Some(path);
        }

        self.icons
            .iter()
            .find(|(name, _)| name.contains(key.as_str()) || key.contains(name.as_str()))
            .map(|(_, path)| path.as_path())
    }
}

/// Icon resolver over several [`IconPack`]s.
///
/// Namespaced types (`"azure/vm"`) are routed to the pack of that namespace;
/// an unknown namespace resolves nothing. Bare types are tried against every
/// pack in registration order.
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    packs: IndexMap<String, IconPack>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans every directory listed in the icon configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Io`] if a configured directory cannot be read.
    pub fn from_config(config: &IconConfig) -> Result<Self, ArborError> {
        config
            .directories()
            .iter()
            .try_fold(Self::new(), |registry, dir| {
                Ok(registry.with_pack(IconPack::from_dir(&dir.namespace, &dir.path)?))
            })
    }

    /// Adds a pack, replacing any pack with the same namespace.
    pub fn with_pack(mut self, pack: IconPack) -> Self {
        self.packs.insert(pack.namespace.clone(), pack);
        self
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.packs.keys().map(String::as_str)
    }
}

impl IconResolver for IconRegistry {
    fn resolve(&self, resource_type: &str) -> Option<PathBuf> {
        let key = resource_type.to_lowercase();

        if let Some((namespace, icon_key)) = key.split_once('/') {
            return self
                .packs
                .get(namespace)
                .and_then(|pack| pack.resolve(icon_key))
                .map(Path::to_path_buf);
        }

        self.packs
            .values()
            .find_map(|pack| pack.resolve(&key))
            .map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_icon_name() {
        assert_eq!(
            normalize_icon_name("10021-icon-service-Virtual Machines.svg"),
            "virtual-machines"
        );
        assert_eq!(normalize_icon_name("00001-ICON-SERVICE-Key Vaults.SVG"), "key-vaults");
        assert_eq!(normalize_icon_name("Front Doors.svg"), "front-doors");
        assert_eq!(normalize_icon_name("123-other.svg"), "123-other");
    }

    #[test]
    fn test_pack_alias_exact_and_fuzzy() {
        let pack = IconPack::new("azure")
            .with_icon("Virtual Machines.svg", "/icons/vm.svg")
            .with_icon("SQL Database.svg", "/icons/sql.svg")
            .with_icon("App Services.svg", "/icons/app.svg");

        assert_eq!(pack.resolve("vm"), Some(Path::new("/icons/vm.svg")));
        assert_eq!(pack.resolve("sql-database"), Some(Path::new("/icons/sql.svg")));
        assert_eq!(pack.resolve("app"), Some(Path::new("/icons/app.svg")));
        assert_eq!(pack.resolve("firewall"), None);
        assert_eq!(pack.resolve(""), None);
    }

    #[test]
    fn test_registry_routes_by_namespace() {
        let registry = IconRegistry::new()
            .with_pack(IconPack::new("azure").with_icon("Virtual Machines.svg", "/azure/vm.svg"))
            .with_pack(IconPack::new("aws").with_icon("EC2.svg", "/aws/ec2.svg"));

        assert_eq!(
            registry.resolve("Azure/VM"),
            Some(PathBuf::from("/azure/vm.svg"))
        );
        assert_eq!(registry.resolve("aws/ec2"), Some(PathBuf::from("/aws/ec2.svg")));
        assert_eq!(registry.resolve("aws/vm"), None);
        assert_eq!(registry.resolve("gcp/ec2"), None);
        assert_eq!(registry.resolve("ec2"), Some(PathBuf::from("/aws/ec2.svg")));
        assert_eq!(registry.namespaces().collect::<Vec<_>>(), ["azure", "aws"]);
    }

    #[test]
    fn test_no_icons() {
        assert_eq!(NoIcons.resolve("azure/vm"), None);
    }

    #[test]
    fn test_pack_from_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("10021-icon-service-Virtual Machines.svg"), "<svg/>")
            .expect("write icon");
        fs::write(dir.path().join("readme.txt"), "not an icon").expect("write file");

        let pack = IconPack::from_dir("azure", dir.path()).expect("readable dir");
        assert_eq!(pack.len(), 1);
        assert_eq!(
            pack.resolve("vm"),
            Some(dir.path().join("10021-icon-service-Virtual Machines.svg").as_path())
        );

        let missing = IconPack::from_dir("azure", &dir.path().join("missing")).expect("empty pack");
        assert!(missing.is_empty());
    }
}
