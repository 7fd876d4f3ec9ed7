//! Chat service descriptors.

use crate::messages::{GetChatHistoryRequest, GetChatHistoryResponse, SignInRequest, SignInResponse};
use svc_descriptor::{AuthedServiceDescriptor, UnauthedServiceDescriptor};

pub static SIGN_IN: UnauthedServiceDescriptor<SignInRequest, SignInResponse> =
    UnauthedServiceDescriptor::new("SignIn", "/SignIn");

pub static GET_CHAT_HISTORY: AuthedServiceDescriptor<GetChatHistoryRequest, GetChatHistoryResponse> =
    AuthedServiceDescriptor::new("GetChatHistory", "/GetChatHistory");
