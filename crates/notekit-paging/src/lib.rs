use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Reserved byte separating resume fields (and the page-size suffix) inside
/// a decoded token.
const FIELD_SEPARATOR: u8 = b';';

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum PageTokenError {
    #[error("malformed page token: {0}")]
    Malformed(String),
    #[error("requested page size {requested} exceeds maximum {max}")]
    PageSizeTooLarge { requested: usize, max: usize },
}

/// Per-resource resume state that can be carried inside an opaque page token.
///
/// A pager owns a FIXED number of positional resume fields. An unset optional
/// field is encoded as an empty byte-string at its position, never omitted,
/// so the field count is the same for every value of the implementing type.
/// `Default` is the explicit empty state decoded into on the first page.
///
/// Field content must not contain the raw `;` separator byte. Identifier and
/// numeric fields cannot produce it; unconstrained free text is only safe in
/// the final field position.
pub trait Pager: Default {
    /// Serialize the resume state into its ordered field list.
    fn encode_fields(&self) -> Vec<Vec<u8>>;

    /// Populate the resume state from an ordered field list.
    ///
    /// # Errors
    /// Returns [`PageTokenError::Malformed`] when the field count does not
    /// match this pager's fixed count, or when an individual field fails its
    /// own sub-parse.
    fn decode_fields(&mut self, fields: &[&[u8]]) -> Result<(), PageTokenError>;
}

/// An opaque continuation token: where a paged query resumes, plus the
/// requested page size. The entire state lives in the encoded string; there
/// is no server-side lifecycle.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PageToken<P> {
    pub data: P,
    pub page_size: usize,
}

impl<P: Pager> PageToken<P> {
    #[must_use]
    pub const fn new(data: P, page_size: usize) -> Self {
        Self { data, page_size }
    }

    /// Encode as a URL-safe, unpadded base64 string:
    /// `base64url_nopad(field_1 ';' ... field_N ';' page_size_decimal)`.
    #[must_use]
    pub fn encode(&self) -> String {
        let fields = self.data.encode_fields();

        let mut raw = Vec::with_capacity(fields.iter().map(|f| f.len() + 1).sum::<usize>() + 20);
        for field in &fields {
            debug_assert!(
                !field.contains(&FIELD_SEPARATOR),
                "resume field contains the reserved separator byte"
            );

            raw.extend_from_slice(field);
            raw.push(FIELD_SEPARATOR);
        }
        raw.extend_from_slice(self.page_size.to_string().as_bytes());

        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decode an opaque token.
    ///
    /// An empty input string is the first-page sentinel: it decodes to the
    /// pager's empty state with `page_size = default_page_size`, untouched by
    /// the ceiling check.
    ///
    /// # Errors
    /// Returns [`PageTokenError::Malformed`] on invalid base64, a field-count
    /// mismatch, a non-numeric page-size suffix, or a failed field sub-parse;
    /// [`PageTokenError::PageSizeTooLarge`] when a syntactically valid token
    /// requests more than `max_page_size` items.
    pub fn decode(
        token: &str,
        default_page_size: usize,
        max_page_size: usize,
    ) -> Result<Self, PageTokenError> {
        if token.is_empty() {
            return Ok(Self::new(P::default(), default_page_size));
        }

        let decoded = Self::decode_parts(token)?;
        if decoded.page_size > max_page_size {
            return Err(PageTokenError::PageSizeTooLarge {
                requested: decoded.page_size,
                max: max_page_size,
            });
        }

        Ok(decoded)
    }

    /// Structural decode without the first-page sentinel or the page-size
    /// ceiling; those are request-parsing policy applied in [`Self::decode`].
    fn decode_parts(token: &str) -> Result<Self, PageTokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|err| PageTokenError::Malformed(format!("invalid base64: {err}")))?;

        let mut parts: Vec<&[u8]> = raw.split(|&byte| byte == FIELD_SEPARATOR).collect();

        // split always yields at least one part, and the last one is the
        // page-size suffix
        let Some(size_part) = parts.pop() else {
            return Err(PageTokenError::Malformed("empty token payload".to_string()));
        };
        let page_size = parse_page_size(size_part)?;

        let mut data = P::default();
        data.decode_fields(&parts)?;

        Ok(Self::new(data, page_size))
    }
}

fn parse_page_size(part: &[u8]) -> Result<usize, PageTokenError> {
    if part.is_empty() || !part.iter().all(u8::is_ascii_digit) {
        return Err(PageTokenError::Malformed(
            "page size is not an unsigned decimal integer".to_string(),
        ));
    }

    // all-ASCII-digits input is valid UTF-8
    let text = std::str::from_utf8(part)
        .map_err(|err| PageTokenError::Malformed(format!("page size is not UTF-8: {err}")))?;

    text.parse()
        .map_err(|err| PageTokenError::Malformed(format!("page size out of range: {err}")))
}

impl<P: Pager> Serialize for PageToken<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de, P: Pager> Deserialize<'de> for PageToken<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        // an empty string here is malformed: the first-page sentinel is an
        // absent parameter, not an empty serialized token
        Self::decode_parts(&text).map_err(de::Error::custom)
    }
}

/// One page of results plus the token for the next page, if any. The token
/// field disappears from the JSON body on the last page.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(bound(
    serialize = "T: Serialize, P: Pager",
    deserialize = "T: Deserialize<'de>, P: Pager"
))]
pub struct Page<T, P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<PageToken<P>>,
    pub items: Vec<T>,
}
