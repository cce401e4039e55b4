pub struct Icons;

impl Icons {
    pub const CLOUD: &str = "☁️";
    pub const IMPORT: &str = "📥";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const INFO: &str = "ℹ️";
    pub const SKIP: &str = "⏭️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const SEARCH: &str = "🔍";
    pub const TRASH: &str = "🗑️";
}
