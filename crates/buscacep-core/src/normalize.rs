//! Upstream response shapes and their mapping into [`CanonicalAddress`].
//!
//! Each upstream gets its own module holding the raw JSON shape and the
//! field-mapping table. The raw shapes stay private: callers only ever see
//! the canonical record produced by the module's [`Decoder`].
//!
//! Mapping is total. Absent and `null` fields both become empty strings, so
//! only a body that is not a JSON object of strings fails to decode.

use crate::CanonicalAddress;

/// Decode a raw response body into a canonical address.
pub type Decoder = fn(&[u8]) -> Result<CanonicalAddress, serde_json::Error>;

/// BrasilAPI CEP v1 (`/api/cep/v1/{cep}`).
pub mod brasil_api {
    use serde::Deserialize;

    use crate::CanonicalAddress;

    pub const NAME: &str = "BrasilAPI";

    #[derive(Debug, Default, Deserialize)]
    struct Response {
        cep: Option<String>,
        state: Option<String>,
        city: Option<String>,
        neighborhood: Option<String>,
        street: Option<String>,
        // Upstream provider BrasilAPI proxied to; the record is labelled
        // with `NAME` instead.
        #[allow(dead_code)]
        service: Option<String>,
    }

    fn normalize(raw: Response) -> CanonicalAddress {
        CanonicalAddress {
            postal_code: raw.cep.unwrap_or_default(),
            state: raw.state.unwrap_or_default(),
            city: raw.city.unwrap_or_default(),
            neighborhood: raw.neighborhood.unwrap_or_default(),
            street: raw.street.unwrap_or_default(),
            source_name: NAME.to_string(),
        }
    }

    pub fn decode(body: &[u8]) -> Result<CanonicalAddress, serde_json::Error> {
        serde_json::from_slice::<Response>(body).map(normalize)
    }

}

/// ViaCEP (`/ws/{cep}/json`).
pub mod via_cep {
    use serde::Deserialize;

    use crate::CanonicalAddress;

    pub const NAME: &str = "ViaCep";

    #[derive(Debug, Default, Deserialize)]
    #[allow(dead_code)]
    struct Response {
        cep: Option<String>,
        logradouro: Option<String>,
        complemento: Option<String>,
        bairro: Option<String>,
        localidade: Option<String>,
        uf: Option<String>,
        ibge: Option<String>,
        gia: Option<String>,
        ddd: Option<String>,
        siafi: Option<String>,
    }

    fn normalize(raw: Response) -> CanonicalAddress {
        CanonicalAddress {
            postal_code: raw.cep.unwrap_or_default(),
            state: raw.uf.unwrap_or_default(),
            city: raw.localidade.unwrap_or_default(),
            neighborhood: raw.bairro.unwrap_or_default(),
            street: raw.logradouro.unwrap_or_default(),
            source_name: NAME.to_string(),
        }
    }

    pub fn decode(body: &[u8]) -> Result<CanonicalAddress, serde_json::Error> {
        serde_json::from_slice::<Response>(body).map(normalize)
    }

}
