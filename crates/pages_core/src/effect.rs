#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one call for `kind` and report back with `Msg::RequestResolved`.
    Submit {
        request_id: crate::RequestId,
        kind: crate::ResultKind,
        context: crate::RequestContext,
    },
    /// Merge the present fields into the relay; absent fields are left untouched.
    PersistStaged(crate::StagedInput),
}
