use glassconfig::NavItemConfig;

/// One nav destination. The set is derived once at construction and never
/// changes; ordering defines the horizontal layout and index-based
/// navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub href: String,
}

impl NavItem {
    /// An empty or placeholder href is inert; selection still animates but
    /// no navigation is scheduled.
    pub fn navigates(&self) -> bool {
        !self.href.is_empty() && self.href != "#"
    }
}

impl From<&NavItemConfig> for NavItem {
    fn from(config: &NavItemConfig) -> Self {
        Self {
            id: config.id.clone(),
            label: config.label.clone(),
            icon: config.icon.clone(),
            href: config.href.clone(),
        }
    }
}
