//! Application configuration: defaults, an optional file and the environment
//!
//! Precedence, lowest first: built-in defaults, the file passed with
//! `--config`, `FIND_LARGE_*` environment variables. Command-line flags are
//! applied on top by the binary.

use std::path::Path;

use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::scan::{DEFAULT_VIDEO_EXTENSIONS, ExclusionSet, LinkPolicy, ScanOptions};

/// System folders skipped by default. `~` is expanded at load time.
pub const DEFAULT_EXCLUDE_PATHS: &[&str] = &[
    // System directories
    "/System",
    "/private",
    "/var/log",
    "/Library/Extensions",
    "/System/Library/PrivateFrameworks",
    "/Library/Kexts/",

    // User Library directories
    "~/Library/Mail",
    "~/Library/Messages",
    "~/Library/Safari",
    "~/Library/Calendars",
    "~/Library/Keychains",
    "~/Library/Containers/com.apple.notes",
    "~/Library/Application Support/AddressBook",
    "~/Library/Application Support/MobileSync",
    "~/Library/Application Support/CallHistoryTransactions",
    "~/Library/Application Support/CloudDocs",
    "~/Library/Application Support/com.apple.sharedfilelist",
    "~/Library/Application Support/Knowledge",
    "~/Library/Application Support/com.apple.TCC",
    "~/Library/Application Support/FileProvider",
    "~/Library/Application Support/FaceTime",
    "~/Library/Application Support/com.apple.avfoundation/Frecents",
    "~/Library/Application Support/CallHistoryDB",

    // Additional Library directories
    "~/Library/Assistant/SiriVocabulary",
    "~/Library/Daemon Containers",
    "~/Library/Autosave Information",
    "~/Library/IdentityServices",
    "~/Library/HomeKit",
    "~/Library/Sharing",
    "~/Library/com.apple.aiml.instrumentation",
    "~/Library/Trial",
    "~/Library/AppleMediaServices",
    "~/Library/DuetExpertCenter",
    "~/Library/Accounts",
    "~/Library/Biome",
    "~/Library/IntelligencePlatform",
    "~/Library/Shortcuts",
    "~/Library/Suggestions",
    "~/Library/Weather",

    // Group Containers
    "~/Library/Group Containers/group.com.apple.stocks-news",
    "~/Library/Group Containers/group.com.apple.photolibraryd.private",
    "~/Library/Group Containers/group.com.apple.accessibility.voicebanking",
    "~/Library/Group Containers/group.com.apple.stocks",
    "~/Library/Group Containers/group.com.apple.secure-control-center-preferences",
    "~/Library/Group Containers/group.com.apple.chronod",
    "~/Library/Group Containers/com.apple.MailPersonaStorage",
    "~/Library/Group Containers/group.com.apple.private.translation",
    "~/Library/Group Containers/group.com.apple.calendar",
    "~/Library/Group Containers/group.com.apple.newsd",
    "~/Library/Group Containers/group.com.apple.ip.redirects",
    "~/Library/Group Containers/group.com.apple.siri.userfeedbacklearning",
    "~/Library/Group Containers/group.com.apple.gamecenter",
    "~/Library/Group Containers/group.com.apple.tips",
    "~/Library/Group Containers/group.com.apple.tv.sharedcontainer",
    "~/Library/Group Containers/group.com.apple.ManagedSettings",
    "~/Library/Group Containers/group.com.apple.sharingd",
    "~/Library/Group Containers/group.com.apple.weather",
    "~/Library/Group Containers/com.apple.systempreferences.cache",
    "~/Library/Group Containers/group.com.apple.feedbacklogger",
    "~/Library/Group Containers/group.com.apple.notes",
    "~/Library/Group Containers/group.com.apple.tipsnext",
    "~/Library/Group Containers/group.com.apple.Safari.SandboxBroker",
    "~/Library/Group Containers/group.com.apple.transparency",
    "~/Library/Group Containers/group.com.apple.reminders",
    "~/Library/Group Containers/group.com.apple.mail",
    "~/Library/Group Containers/com.apple.bird",
    "~/Library/Group Containers/group.com.apple.DeviceActivity",
    "~/Library/Group Containers/com.apple.Home.group",
    "~/Library/Group Containers/group.com.apple.iCloudDrive",
    "~/Library/Group Containers/com.apple.PreviewLegacySignaturesConversion",
    "~/Library/Group Containers/group.com.apple.AppleSpell",
    "~/Library/Group Containers/group.com.apple.mlhost",
    "~/Library/Group Containers/group.com.apple.PegasusConfiguration",
    "~/Library/Group Containers/group.com.apple.shortcuts",
    "~/Library/Group Containers/com.apple.MessagesLegacyTransferArchive",

    // Containers
    "~/Library/Containers/com.apple.VoiceMemos",
    "~/Library/Containers/com.apple.archiveutility",
    "~/Library/Containers/com.apple.Maps/Data/Maps",
    "~/Library/Containers/com.apple.Home",
    "~/Library/Containers/com.apple.Safari",
    "~/Library/Containers/com.apple.CloudDocs.MobileDocumentsFileProvider",
    "~/Library/Containers/com.apple.mail",
    "~/Library/Containers/com.apple.MobileSMS",
    "~/Library/Containers/com.apple.Notes",
    "~/Library/Containers/com.apple.news",
    "~/Library/Containers/com.apple.corerecents.recentsd/Data/Library/Recents",
    "~/Library/Containers/com.apple.stocks",
    "~/Library/Containers/com.apple.Safari.WebApp",

    // Additional system directories
    "~/Library/ContainerManager",
    "~/Library/PersonalizationPortrait",
    "~/Library/Photos/Libraries/Syndication.photoslibrary",
    "~/Library/Metadata/CoreSpotlight",
    "~/Library/Metadata/com.apple.IntelligentSuggestions",
    "~/Library/Cookies",
    "~/Library/CoreFollowUp",
    "~/Library/StatusKit",
    "~/Library/DoNotDisturb",

    // Cache directories
    "~/Library/Caches/com.apple.HomeKit",
    "~/Library/Caches/CloudKit",
    "~/Library/Caches/com.apple.Safari",
    "~/Library/Caches/com.apple.findmy.imagecache",
    "~/Library/Caches/com.apple.findmy.fmfcore",
    "~/Library/Caches/com.apple.containermanagerd",
    "~/Library/Caches/FamilyCircle",
    "~/Library/Caches/com.apple.homed",
    "~/Library/Caches/com.apple.findmy.fmipcore",
    "~/Library/Caches/com.apple.ap.adprivacyd",

    // Other
    "~/.Trash",
    "~/Pictures/Photos Library.photoslibrary",
    "~/Dropbox",
    "~/Library/CloudStorage/Dropbox",
    "~/Library/Containers/com.apple.CloudPhotosConfiguration",
    "~/Library/Containers/com.apple.dp.PrivateFederatedLearning.DPMLRuntimePluginClassB/",
];

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub exclude_paths: Vec<String>,
    pub exclude_names: Vec<String>,
    pub hidden_allow_list: Vec<String>,
    pub video_extensions: Vec<String>,
    pub case_insensitive: bool,
    pub follow_links: bool,
    pub jobs: usize,
}

impl AppConfig {
    /// Build the immutable exclusion set for one invocation.
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::builder()
            .exclude_paths(
                self.exclude_paths
                    .iter()
                    .map(|p| shellexpand::tilde(p).into_owned()),
            )
            .exclude_names(self.exclude_names.iter().cloned())
            .allow_hidden_names(self.hidden_allow_list.iter().cloned())
            .case_insensitive(self.case_insensitive)
            .build()
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            link_policy: if self.follow_links {
                LinkPolicy::Follow
            } else {
                LinkPolicy::Physical
            },
            workers: self.jobs,
            ..ScanOptions::default()
        }
        .with_video_extensions(&self.video_extensions)
    }
}

pub fn load_configuration(file: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("exclude_paths", DEFAULT_EXCLUDE_PATHS.to_vec())?
        .set_default("exclude_names", Vec::<String>::new())?
        .set_default("hidden_allow_list", Vec::<String>::new())?
        .set_default("video_extensions", DEFAULT_VIDEO_EXTENSIONS.to_vec())?
        .set_default("case_insensitive", false)?
        .set_default("follow_links", false)?
        .set_default("jobs", 1_i64)?;

    if let Some(path) = file {
        builder = builder.add_source(ConfigFile::from(path).required(true));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("FIND_LARGE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclude_paths")
                .with_list_parse_key("exclude_names")
                .with_list_parse_key("hidden_allow_list")
                .with_list_parse_key("video_extensions"),
        )
        .build()?;

    settings.try_deserialize::<AppConfig>()
}
