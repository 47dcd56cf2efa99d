/// The six recognized document categories of a registration form.
///
/// The wire names are the multipart field names clients submit files under.
/// Mapping from a field name is total: anything outside this set is
/// unrecognized and gets dropped by the classifier, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    IdentityDocument,
    ResidencyProof,
    Qualifications,
    BusinessPermit,
    LiabilityInsurance,
    CompanyStatutes,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 6] = [
        DocumentCategory::IdentityDocument,
        DocumentCategory::ResidencyProof,
        DocumentCategory::Qualifications,
        DocumentCategory::BusinessPermit,
        DocumentCategory::LiabilityInsurance,
        DocumentCategory::CompanyStatutes,
    ];

    /// Multipart field name (and response key) for this category.
    pub fn field_name(&self) -> &'static str {
        match self {
            DocumentCategory::IdentityDocument => "identityDocument",
            DocumentCategory::ResidencyProof => "residencyProof",
            DocumentCategory::Qualifications => "qualifications",
            DocumentCategory::BusinessPermit => "businessPermit",
            DocumentCategory::LiabilityInsurance => "liabilityInsurance",
            DocumentCategory::CompanyStatutes => "companyStatutes",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        DocumentCategory::ALL
            .into_iter()
            .find(|category| category.field_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for category in DocumentCategory::ALL {
            assert_eq!(
                DocumentCategory::from_field_name(category.field_name()),
                Some(category)
            );
        }
    }

    #[test]
    fn unknown_field_names_do_not_map() {
        assert_eq!(DocumentCategory::from_field_name("avatar"), None);
        assert_eq!(DocumentCategory::from_field_name(""), None);
        // Matching is exact; the wire names are camelCase.
        assert_eq!(DocumentCategory::from_field_name("identitydocument"), None);
    }
}
