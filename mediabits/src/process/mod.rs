/// Field-by-field decoding driven by codec syntax descriptors.
///
/// Provides [`FieldDecoder`](fields::FieldDecoder), which runs a list of
/// [`FieldSpec`](fields::FieldSpec) against either reader and stops at the
/// first failure.
pub mod fields;
