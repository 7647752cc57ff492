use crate::device::DeviceCatalog;
use crate::device::DeviceProfile;
use tracing::debug;
use tracing::warn;

/// Finds the catalog profile a session is emulating.
#[derive(Debug, Clone, Copy)]
pub struct DeviceResolver<'a> {
    catalog: &'a DeviceCatalog,
}

impl<'a> DeviceResolver<'a> {
    pub fn new(catalog: &'a DeviceCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, user_agent: &str) -> Option<&'a DeviceProfile> {
        self.resolve_named(user_agent).map(|(_, profile)| profile)
    }

    /// First profile, in catalog order, whose user agent contains
    /// `user_agent`. A miss is logged and returned as `None`.
    pub fn resolve_named(&self, user_agent: &str) -> Option<(&'a str, &'a DeviceProfile)> {
        let found = if user_agent.is_empty() {
            None
        } else {
            self.catalog
                .iter()
                .find(|(_, profile)| profile.user_agent.contains(user_agent))
        };

        match found {
            Some((name, _)) => debug!("Resolved user agent to device {name:?}"),
            None => warn!("Could not find device for user agent: {user_agent}"),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    const PIXEL_UA: &str = "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.6778.33 Mobile Safari/537.36";

    fn catalog() -> DeviceCatalog {
        DeviceCatalog::default()
            .with_device("Desktop", DeviceProfile::new("Mozilla/5.0 (X11) Desktop"))
            .with_device("Pixel 5", DeviceProfile::new(PIXEL_UA).mobile(true))
            .with_device(
                "Pixel 5 landscape",
                DeviceProfile::new(format!("{PIXEL_UA} landscape")).mobile(true),
            )
    }

    #[test]
    fn exact_user_agent_resolves() {
        let catalog = catalog();
        let resolver = DeviceResolver::new(&catalog);
        let (name, profile) = resolver.resolve_named(PIXEL_UA).expect("match");
        assert_eq!(name, "Pixel 5");
        assert!(profile.is_mobile);
    }

    #[test]
    fn catalog_entry_only_needs_to_contain_the_session_user_agent() {
        let catalog = catalog();
        let resolver = DeviceResolver::new(&catalog);
        let (name, _) = resolver.resolve_named("Pixel 5)").expect("substring match");
        assert_eq!(name, "Pixel 5");
    }

    #[test]
    fn containment_is_one_directional() {
        let catalog = catalog();
        let resolver = DeviceResolver::new(&catalog);
        let longer = format!("{PIXEL_UA} extra trailing token that no entry carries");
        assert_eq!(resolver.resolve(&longer), None);
    }

    #[test]
    fn first_match_in_catalog_order_wins() {
        let original = catalog();
        let mut entries: Vec<(String, DeviceProfile)> = original
            .iter()
            .map(|(name, profile)| (name.to_string(), profile.clone()))
            .collect();
        entries.reverse();
        let reversed: DeviceCatalog = entries.into_iter().collect();
        let resolver = DeviceResolver::new(&reversed);
        let (name, _) = resolver.resolve_named(PIXEL_UA).expect("match");
        assert_eq!(name, "Pixel 5 landscape");
    }

    #[traced_test]
    #[test]
    fn unknown_user_agent_warns_once() {
        let catalog = catalog();
        let resolver = DeviceResolver::new(&catalog);
        assert_eq!(resolver.resolve("NotABrowser/1.0"), None);
        logs_assert(|lines: &[&str]| {
            let warnings = lines
                .iter()
                .filter(|line| line.contains("Could not find device for user agent: NotABrowser/1.0"))
                .count();
            if warnings == 1 {
                Ok(())
            } else {
                Err(format!("expected one warning, got {warnings}"))
            }
        });
    }

    #[traced_test]
    #[test]
    fn empty_user_agent_is_a_miss() {
        let catalog = catalog();
        let resolver = DeviceResolver::new(&catalog);
        assert_eq!(resolver.resolve(""), None);
        assert!(logs_contain("Could not find device for user agent"));
    }
}
