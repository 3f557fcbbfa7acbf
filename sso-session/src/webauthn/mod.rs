mod ceremony;
mod errors;
mod types;

pub use ceremony::Authenticator;
pub use errors::WebAuthnError;
pub use types::{
    AssertionCredential, AssertionPayload, AttestationPayload, AuthenticatorSelection,
    CreatedCredential, CredentialCreationOptions, CredentialDescriptor, CredentialRequestOptions,
    PubKeyCredParam, PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions,
    PublicKeyCredentialUserEntity, RelyingParty,
};
