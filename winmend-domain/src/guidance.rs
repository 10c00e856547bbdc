use winmend_types::OsDescriptor;

/// Maps a product-name fragment to a vendor download page.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceRule {
    pub pattern: &'static str,
    pub url: &'static str,
}

/// Ordered guidance table; first pattern contained in the product name wins.
pub static GUIDANCE_RULES: &[GuidanceRule] = &[
    GuidanceRule {
        pattern: "Windows 10",
        url: "https://www.microsoft.com/software-download/windows10",
    },
    GuidanceRule {
        pattern: "Windows 11",
        url: "https://www.microsoft.com/software-download/windows11",
    },
    GuidanceRule {
        pattern: "Server 2016",
        url: "https://www.microsoft.com/evalcenter/download-windows-server-2016",
    },
    GuidanceRule {
        pattern: "Server 2019",
        url: "https://www.microsoft.com/evalcenter/download-windows-server-2019",
    },
    GuidanceRule {
        pattern: "Server 2022",
        url: "https://www.microsoft.com/evalcenter/download-windows-server-2022",
    },
    GuidanceRule {
        pattern: "Server 2025",
        url: "https://www.microsoft.com/evalcenter/download-windows-server-2025",
    },
];

pub const DEFAULT_GUIDANCE_URL: &str = "https://www.microsoft.com/software-download";

/// Resolve the download page for a normalized descriptor. Always succeeds.
pub fn guidance_url(os: &OsDescriptor) -> &'static str {
    GUIDANCE_RULES
        .iter()
        .find(|rule| os.product_name.contains(rule.pattern))
        .map(|rule| rule.url)
        .unwrap_or(DEFAULT_GUIDANCE_URL)
}
