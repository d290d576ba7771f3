//! Billing form state and validation.
//!
//! Validation is form-level and never reaches the network: an invalid
//! submission stays in the editing state with field-level errors.

use food_express_core::Customer;

/// Billing and delivery address details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub state: String,
    pub city: String,
    pub zip: String,
}

/// One invalid field and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Field-level validation errors, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingFormErrors(pub Vec<FieldError>);

impl BillingFormErrors {
    /// Whether a particular field failed validation.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl std::fmt::Display for BillingFormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl BillingForm {
    /// Validate every field, collecting all errors rather than stopping at
    /// the first.
    ///
    /// # Errors
    ///
    /// Returns the full set of field errors if any field is invalid.
    pub fn validate(&self) -> Result<(), BillingFormErrors> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("state", &self.state),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field,
                    message: "is required",
                });
            }
        }

        if !is_plausible_email(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "must be a valid email address",
            });
        }

        if !is_fixed_length_digits(&self.phone, 10) {
            errors.push(FieldError {
                field: "phoneNumber",
                message: "must be exactly 10 digits",
            });
        }

        if !is_fixed_length_digits(&self.zip, 6) {
            errors.push(FieldError {
                field: "zip",
                message: "must be exactly 6 digits",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BillingFormErrors(errors))
        }
    }

    /// Prefill contact fields from the customer profile.
    ///
    /// The profile's single `name` splits into first name and the rest;
    /// address fields are left for the customer to enter.
    pub fn prefill_from(&mut self, customer: &Customer) {
        let mut parts = customer.name.split_whitespace();
        self.first_name = parts.next().unwrap_or_default().to_string();
        self.last_name = parts.collect::<Vec<_>>().join(" ");
        self.email = customer.email.clone();
        self.phone = customer.phone.clone();
    }

    /// Full name as handed to the payment widget.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Single-line delivery address as submitted with the finalized order.
    #[must_use]
    pub fn delivery_address(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.address, self.city, self.state, self.zip
        )
    }
}

fn is_fixed_length_digits(value: &str, length: usize) -> bool {
    value.len() == length && value.chars().all(|c| c.is_ascii_digit())
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
