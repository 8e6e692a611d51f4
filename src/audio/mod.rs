/// Audio layer: catalog enumeration, decoding, and playback.
///
/// Architecture:
/// ```text
///  directory of .wav / .mp3 / .flac / .ogg / .m4a
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  list + sort files → FileCatalog of AudioAsset
///   └──────────┘
///        │ lazily, once per asset
///        ▼
///   ┌──────────┐
///   │ decode    │  hound / symphonia → mono f64 waveform
///   └──────────┘
///
///   playback is a separate narrow interface over the output device,
///   never entered by the analysis pipeline.
/// ```
pub mod catalog;
pub mod decode;
pub mod playback;
