//! Static itag profile table.
//!
//! Each itag is a platform-defined id for a fixed quality/codec profile.
//! Resolution is `None` for audio-only formats and abr is `None` for
//! video-only formats.

use crate::error::{Result, StreamError};

type Row = (u32, Option<&'static str>, Option<&'static str>);

const PROGRESSIVE_VIDEO: &[Row] = &[
    (5, Some("240p"), Some("64kbps")),
    (6, Some("270p"), Some("64kbps")),
    (13, Some("144p"), None),
    (17, Some("144p"), Some("24kbps")),
    (18, Some("360p"), Some("96kbps")),
    (22, Some("720p"), Some("192kbps")),
    (34, Some("360p"), Some("128kbps")),
    (35, Some("480p"), Some("128kbps")),
    (36, Some("240p"), None),
    (37, Some("1080p"), Some("192kbps")),
    (38, Some("3072p"), Some("192kbps")),
    (43, Some("360p"), Some("128kbps")),
    (44, Some("480p"), Some("128kbps")),
    (45, Some("720p"), Some("192kbps")),
    (46, Some("1080p"), Some("192kbps")),
    (59, Some("480p"), Some("128kbps")),
    (78, Some("480p"), Some("128kbps")),
    (82, Some("360p"), Some("128kbps")),
    (83, Some("480p"), Some("128kbps")),
    (84, Some("720p"), Some("192kbps")),
    (85, Some("1080p"), Some("192kbps")),
    (91, Some("144p"), Some("48kbps")),
    (92, Some("240p"), Some("48kbps")),
    (93, Some("360p"), Some("128kbps")),
    (94, Some("480p"), Some("128kbps")),
    (95, Some("720p"), Some("256kbps")),
    (96, Some("1080p"), Some("256kbps")),
    (100, Some("360p"), Some("128kbps")),
    (101, Some("480p"), Some("192kbps")),
    (102, Some("720p"), Some("192kbps")),
    (132, Some("240p"), Some("48kbps")),
    (151, Some("720p"), Some("24kbps")),
    (300, Some("720p"), Some("128kbps")),
    (301, Some("1080p"), Some("128kbps")),
];

const DASH_VIDEO: &[Row] = &[
    // mp4
    (133, Some("240p"), None),
    (134, Some("360p"), None),
    (135, Some("480p"), None),
    (136, Some("720p"), None),
    (137, Some("1080p"), None),
    (138, Some("2160p"), None),
    (160, Some("144p"), None),
    (212, Some("480p"), None),
    (264, Some("1440p"), None),
    (266, Some("2160p"), None),
    (298, Some("720p"), None),
    (299, Some("1080p"), None),
    // webm
    (167, Some("360p"), None),
    (168, Some("480p"), None),
    (169, Some("720p"), None),
    (170, Some("1080p"), None),
    (218, Some("480p"), None),
    (219, Some("480p"), None),
    (242, Some("240p"), None),
    (243, Some("360p"), None),
    (244, Some("480p"), None),
    (245, Some("480p"), None),
    (246, Some("480p"), None),
    (247, Some("720p"), None),
    (248, Some("1080p"), None),
    (271, Some("1440p"), None),
    (272, Some("4320p"), None),
    (278, Some("144p"), None),
    (302, Some("720p"), None),
    (303, Some("1080p"), None),
    (308, Some("1440p"), None),
    (313, Some("2160p"), None),
    (315, Some("2160p"), None),
    (330, Some("144p"), None),
    (331, Some("240p"), None),
    (332, Some("360p"), None),
    (333, Some("480p"), None),
    (334, Some("720p"), None),
    (335, Some("1080p"), None),
    (336, Some("1440p"), None),
    (337, Some("2160p"), None),
    // av1
    (394, Some("144p"), None),
    (395, Some("240p"), None),
    (396, Some("360p"), None),
    (397, Some("480p"), None),
    (398, Some("720p"), None),
    (399, Some("1080p"), None),
    (400, Some("1440p"), None),
    (401, Some("2160p"), None),
    (402, Some("4320p"), None),
];

const DASH_AUDIO: &[Row] = &[
    (139, None, Some("48kbps")),
    (140, None, Some("128kbps")),
    (141, None, Some("256kbps")),
    (171, None, Some("128kbps")),
    (172, None, Some("256kbps")),
    (249, None, Some("50kbps")),
    (250, None, Some("70kbps")),
    (251, None, Some("160kbps")),
    (256, None, Some("192kbps")),
    (258, None, Some("384kbps")),
    (325, None, None),
    (328, None, None),
];

const HIGH_FPS: &[u32] = &[298, 299, 302, 303, 308, 315, 334, 335, 336, 337];
const THREE_D: &[u32] = &[82, 83, 84, 85, 100, 101, 102];
const HDR: &[u32] = &[330, 331, 332, 333, 334, 335, 336, 337];
const LIVE: &[u32] = &[91, 92, 93, 94, 95, 96, 132, 151];

/// Quality attributes of one itag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatProfile {
    pub itag: u32,
    /// e.g. `"720p"`; `None` for audio-only formats.
    pub resolution: Option<&'static str>,
    /// Average audio bitrate, e.g. `"128kbps"`.
    pub abr: Option<&'static str>,
    pub fps: u32,
    pub is_3d: bool,
    pub is_hdr: bool,
    pub is_live: bool,
    pub is_dash: bool,
}

/// Looks up `itag`; unknown itags are [`StreamError::UnknownFormat`].
pub fn get_format_profile(itag: u32) -> Result<FormatProfile> {
    let find = |table: &[Row]| table.iter().find(|(i, _, _)| *i == itag).copied();
    let dash = find(DASH_VIDEO).or_else(|| find(DASH_AUDIO));
    let (_, resolution, abr) = dash
        .or_else(|| find(PROGRESSIVE_VIDEO))
        .ok_or(StreamError::UnknownFormat(itag))?;

    Ok(FormatProfile {
        itag,
        resolution,
        abr,
        fps: if HIGH_FPS.contains(&itag) { 60 } else { 30 },
        is_3d: THREE_D.contains(&itag),
        is_hdr: HDR.contains(&itag),
        is_live: LIVE.contains(&itag),
        is_dash: dash.is_some(),
    })
}
