use wvkeys_proto::{WidevinePsshData, prost::Message};

use crate::constants::{PSSH_HEADER_LEN, PSSH_MAX_PAYLOAD_LEN, WIDEVINE_SYSTEM_ID};
use crate::error::{CdmResult, InitDataError};

/**
    Content protection header a license request is built for.

    Either a Widevine `pssh` box (synthesized around a bare payload when the
    input lacks one) with its parsed `WidevinePsshData`, or opaque header
    bytes handed over by a provider that skips the box entirely.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct InitData {
    source: Source,
}

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Pssh {
        data: Vec<u8>,
        header: WidevinePsshData,
    },
    Raw(Vec<u8>),
}

impl InitData {
    /**
        Normalize `pssh` into a Widevine box and parse its header.

        Fails with [`InitDataError::Parse`] when the header bytes are malformed
        and [`InitDataError::PayloadTooLarge`] when a bare payload cannot be framed.
    */
    pub fn from_pssh(pssh: impl AsRef<[u8]>) -> CdmResult<Self> {
        let data = normalize_pssh(pssh.as_ref())?;
        let payload = data.get(PSSH_HEADER_LEN..).ok_or_else(|| {
            InitDataError::Parse(format!("box is {} bytes, header ends at 32", data.len()))
        })?;
        let header = WidevinePsshData::decode(payload)
            .map_err(|e| InitDataError::Parse(e.to_string()))?;

        log::trace!(
            "parsed init data header with {} key id(s)",
            header.key_ids.len()
        );

        Ok(Self {
            source: Source::Pssh { data, header },
        })
    }

    /// Parse a base64-encoded `pssh` box or bare payload.
    pub fn from_pssh_base64(pssh: &str) -> CdmResult<Self> {
        let bytes = data_encoding::BASE64
            .decode(pssh.trim().as_bytes())
            .map_err(|e| InitDataError::InvalidBase64(format!("PSSH: {e}")))?;
        Self::from_pssh(bytes)
    }

    /**
        Use `header` as the final content header. No box handling or parsing
        happens; the bytes are embedded in the request as given.
    */
    pub fn from_raw_header(header: impl Into<Vec<u8>>) -> Self {
        Self {
            source: Source::Raw(header.into()),
        }
    }

    /// Whether this was built with [`InitData::from_raw_header`].
    pub fn is_raw(&self) -> bool {
        matches!(self.source, Source::Raw(_))
    }

    /// The parsed Widevine header, `None` for raw headers.
    pub fn header(&self) -> Option<&WidevinePsshData> {
        match &self.source {
            Source::Pssh { header, .. } => Some(header),
            Source::Raw(_) => None,
        }
    }

    /// The normalized box bytes, `None` for raw headers.
    pub fn pssh(&self) -> Option<&[u8]> {
        match &self.source {
            Source::Pssh { data, .. } => Some(data),
            Source::Raw(_) => None,
        }
    }

    /// Key ids listed in the parsed header. Always empty for raw headers.
    pub fn key_ids(&self) -> &[Vec<u8>] {
        self.header().map(|h| h.key_ids.as_slice()).unwrap_or_default()
    }

    /**
        Bytes placed in the request's content identification.

        For a box this is the payload exactly as carried, not a re-encoding
        of [`InitData::header`], so fields the decoder does not know about
        still reach the server.
    */
    pub(crate) fn content_header(&self) -> Vec<u8> {
        match &self.source {
            Source::Pssh { data, .. } => data.get(PSSH_HEADER_LEN..).unwrap_or_default().to_vec(),
            Source::Raw(raw) => raw.clone(),
        }
    }
}

/**
    Wrap `input` in a minimal version 0 `pssh` box unless it already carries the
    Widevine system id at bytes `12..28`.

    Synthesized layout:

    ```text
    [0..3]    00 00 00
    [3]       total size (32 + payload length)
    [4..8]    "pssh"
    [8..12]   00 00 00 00          version / flags
    [12..28]  Widevine system id
    [28..31]  00 00 00
    [31]      payload length
    [32..]    payload
    ```

    Idempotent: an already normalized box is returned unchanged.
*/
pub fn normalize_pssh(input: &[u8]) -> CdmResult<Vec<u8>> {
    if input.get(12..28) == Some(WIDEVINE_SYSTEM_ID.as_slice()) {
        log::debug!("init data already carries the Widevine system id");
        return Ok(input.to_vec());
    }

    if input.len() > PSSH_MAX_PAYLOAD_LEN {
        return Err(InitDataError::PayloadTooLarge(input.len()).into());
    }

    log::debug!("wrapping {} byte init data payload in a pssh box", input.len());

    let mut out = Vec::with_capacity(PSSH_HEADER_LEN + input.len());
    out.extend_from_slice(&[0, 0, 0, (PSSH_HEADER_LEN + input.len()) as u8]);
    out.extend_from_slice(b"pssh");
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&WIDEVINE_SYSTEM_ID);
    out.extend_from_slice(&[0, 0, 0, input.len() as u8]);
    out.extend_from_slice(input);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CdmError;
    use hex_literal::hex;

    const KID: [u8; 16] = hex!("00112233445566778899aabbccddeeff");

    fn payload() -> Vec<u8> {
        WidevinePsshData {
            key_ids: vec![KID.to_vec()],
            provider: Some("acme".into()),
            content_id: Some(b"movie-42".to_vec()),
            ..Default::default()
        }
        .encode_to_vec()
    }

    #[test]
    fn synthesized_box_layout() {
        let payload = payload();
        let boxed = normalize_pssh(&payload).unwrap();

        assert_eq!(boxed.len(), 32 + payload.len());
        assert_eq!(boxed[..3], [0, 0, 0]);
        assert_eq!(boxed[3] as usize, 32 + payload.len());
        assert_eq!(&boxed[4..8], b"pssh");
        assert_eq!(boxed[8..12], [0; 4]);
        assert_eq!(boxed[12..28], WIDEVINE_SYSTEM_ID);
        assert_eq!(boxed[28..31], [0; 3]);
        assert_eq!(boxed[31] as usize, payload.len());
        assert_eq!(boxed[32..], payload[..]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_pssh(&payload()).unwrap();
        let twice = normalize_pssh(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn existing_box_is_untouched() {
        let mut existing = normalize_pssh(&payload()).unwrap();
        // a foreign size field must survive, only the system id decides
        existing[0] = 0x7f;
        assert_eq!(normalize_pssh(&existing).unwrap(), existing);
    }

    #[test]
    fn payload_size_limit() {
        let largest = vec![0u8; 223];
        let boxed = normalize_pssh(&largest).unwrap();
        assert_eq!(boxed[3], 255);
        assert_eq!(boxed[31], 223);

        let err = normalize_pssh(&[0u8; 224]).unwrap_err();
        assert!(matches!(
            err,
            CdmError::InitData(InitDataError::PayloadTooLarge(224))
        ));
    }

    #[test]
    fn from_pssh_parses_header() {
        let init = InitData::from_pssh(payload()).unwrap();
        assert!(!init.is_raw());
        assert_eq!(init.key_ids(), &[KID.to_vec()]);
        let header = init.header().unwrap();
        assert_eq!(header.provider.as_deref(), Some("acme"));
        assert_eq!(init.pssh().unwrap()[12..28], WIDEVINE_SYSTEM_ID);
        assert_eq!(init.content_header(), payload());
    }

    #[test]
    fn unknown_header_fields_survive() {
        // key_ids, then field 20 (varint 7) which WidevinePsshData does not declare
        let mut payload = vec![0x12, 0x10];
        payload.extend_from_slice(&[0xab; 16]);
        payload.extend_from_slice(&[0xa0, 0x01, 0x07]);

        let init = InitData::from_pssh(&payload).unwrap();
        assert_eq!(init.key_ids(), &[vec![0xab; 16]]);
        assert_eq!(init.content_header(), payload);
        assert_ne!(init.header().unwrap().encode_to_vec(), payload);

        let boxed = InitData::from_pssh(normalize_pssh(&payload).unwrap()).unwrap();
        assert_eq!(boxed.content_header(), payload);
    }

    #[test]
    fn boxed_and_bare_payloads_agree() {
        let boxed = normalize_pssh(&payload()).unwrap();
        assert_eq!(
            InitData::from_pssh(&boxed).unwrap(),
            InitData::from_pssh(payload()).unwrap()
        );
    }

    #[test]
    fn malformed_header_is_parse_error() {
        // key_ids field claims 16 bytes, only 1 follows
        let err = InitData::from_pssh([0x12u8, 0x10, 0x00]).unwrap_err();
        assert!(err.is_init_data_error());
        assert!(matches!(err, CdmError::InitData(InitDataError::Parse(_))));
    }

    #[test]
    fn truncated_box_is_parse_error() {
        let boxed = normalize_pssh(&payload()).unwrap();
        let err = InitData::from_pssh(&boxed[..30]).unwrap_err();
        assert!(matches!(err, CdmError::InitData(InitDataError::Parse(_))));
    }

    #[test]
    fn base64_front_end() {
        let boxed = normalize_pssh(&payload()).unwrap();
        let encoded = data_encoding::BASE64.encode(&boxed);
        let init = InitData::from_pssh_base64(&format!(" {encoded}\n")).unwrap();
        assert_eq!(init.pssh().unwrap(), boxed.as_slice());

        let err = InitData::from_pssh_base64("not base64!").unwrap_err();
        assert!(matches!(err, CdmError::InitData(InitDataError::InvalidBase64(_))));
    }

    #[test]
    fn raw_header_bypasses_parsing() {
        let init = InitData::from_raw_header(vec![0xff, 0xfe, 0xfd]);
        assert!(init.is_raw());
        assert!(init.header().is_none());
        assert!(init.pssh().is_none());
        assert!(init.key_ids().is_empty());
        assert_eq!(init.content_header(), [0xff, 0xfe, 0xfd]);
    }
}
