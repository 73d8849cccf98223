//! Fixed outbound links and contact text.

/// Creator's Roblox profile.
pub const ROBLOX_PROFILE: &str = "https://www.roblox.com/users/7100520844/profile";

/// Creator's Scratch profile.
pub const SCRATCH_PROFILE: &str = "https://scratch.mit.edu/users/coolcats153122/";

/// Scratch studio used as the contact channel.
pub const CONTACT_STUDIO: &str = "https://scratch.mit.edu/studios/36783153/comments";

/// Issue report template shown on the about and information pages.
pub const REPORT_TEMPLATE: &str = "\
Hi there! I wanted to let you know about something in the game that needs attention:

[Describe what happened]
- Game Pass/Item: [Name of the game pass or item]
- Issue Type: [Bug/Visual Issue/Content Concern]
- Details: [Briefly explain what happened]

Thank you for helping improve the experience for everyone!
";
