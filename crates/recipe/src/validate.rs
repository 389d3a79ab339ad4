use std::{borrow::Cow, collections::HashSet};

use validator::{Validate, ValidationError, ValidationErrors};

use crate::{IngredientAmount, RecipeInput};

pub const MAX_AMOUNT: i64 = 32767;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Trims the text fields so blank values are caught by [`validate_input`].
pub(crate) fn normalize(mut input: RecipeInput) -> RecipeInput {
    input.name = input.name.map(|name| name.trim().to_owned());
    input.text = input.text.map(|text| text.trim().to_owned());
    input
}

/// Shape checks that need no storage access. Scalar fields are required when
/// creating and optional when patching; associations are always required.
pub(crate) fn validate_input(
    input: &RecipeInput,
    creating: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = input.validate().err().unwrap_or_default();

    for (field, value) in [("name", &input.name), ("text", &input.text)] {
        if value.as_deref().is_some_and(str::is_empty) {
            errors.add(field, error("blank", "This field may not be blank."));
        }
    }

    if creating {
        let missing = [
            ("name", input.name.is_none()),
            ("text", input.text.is_none()),
            ("cooking_time", input.cooking_time.is_none()),
            ("image", input.image.is_none()),
        ];

        for (field, missing) in missing {
            if missing {
                errors.add(field, error("required", "This field is required."));
            }
        }
    }

    match input.ingredients.as_deref() {
        None => errors.add("ingredients", error("required", "This field is required.")),
        Some(items) => {
            if let Err(err) = check_ingredients(items) {
                errors.add("ingredients", err);
            }
        }
    }

    match input.tags.as_deref() {
        None => errors.add("tags", error("required", "Tag list is missing.")),
        Some(tags) => {
            if let Err(err) = check_tags(tags) {
                errors.add("tags", err);
            }
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    Err(errors)
}

pub fn check_ingredients(items: &[IngredientAmount]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(error("empty", "At least one ingredient is required."));
    }

    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id) {
            return Err(error("duplicate", "Ingredients must not repeat."));
        }

        if !(1..=MAX_AMOUNT).contains(&item.amount) {
            return Err(error(
                "amount",
                format!("Ingredient amount must be between 1 and {MAX_AMOUNT}."),
            ));
        }
    }

    Ok(())
}

pub fn check_tags(tags: &[i64]) -> Result<(), ValidationError> {
    if tags.is_empty() {
        return Err(error("empty", "No tag selected."));
    }

    let mut seen = HashSet::new();
    if tags.iter().any(|id| !seen.insert(*id)) {
        return Err(error("duplicate", "Tags must not repeat."));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RecipeInput {
        RecipeInput {
            name: Some("Pancakes".to_owned()),
            text: Some("Mix and fry.".to_owned()),
            cooking_time: Some(20),
            image: Some("recipes/images/pancakes.png".to_owned()),
            ingredients: Some(vec![
                IngredientAmount { id: 1, amount: 200 },
                IngredientAmount { id: 2, amount: 2 },
            ]),
            tags: Some(vec![1]),
        }
    }

    #[test]
    fn accepts_complete_input() {
        assert!(validate_input(&input(), true).is_ok());
    }

    #[test]
    fn rejects_duplicate_ingredient() {
        let mut input = input();
        input.ingredients = Some(vec![
            IngredientAmount { id: 1, amount: 200 },
            IngredientAmount { id: 1, amount: 5 },
        ]);

        let errors = validate_input(&input, true).unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["ingredients"][0].code, "duplicate");
    }

    #[test]
    fn rejects_zero_amount() {
        let err = check_ingredients(&[IngredientAmount { id: 1, amount: 0 }]).unwrap_err();
        assert_eq!(err.code, "amount");

        let err = check_ingredients(&[IngredientAmount { id: 1, amount: 32768 }]).unwrap_err();
        assert_eq!(err.code, "amount");

        assert!(check_ingredients(&[IngredientAmount { id: 1, amount: 32767 }]).is_ok());
    }

    #[test]
    fn rejects_missing_or_empty_lists() {
        let mut input = input();
        input.ingredients = Some(vec![]);
        input.tags = None;

        let errors = validate_input(&input, true).unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["ingredients"][0].code, "empty");
        assert_eq!(fields["tags"][0].code, "required");

        assert_eq!(check_tags(&[]).unwrap_err().code, "empty");
        assert_eq!(check_tags(&[1, 2, 1]).unwrap_err().code, "duplicate");
    }

    #[test]
    fn patch_keeps_scalars_optional() {
        let input = RecipeInput {
            name: None,
            text: None,
            cooking_time: None,
            image: None,
            ..input()
        };

        assert!(validate_input(&input, true).is_err());
        assert!(validate_input(&input, false).is_ok());
    }

    #[test]
    fn blank_text_fields_are_rejected() {
        let mut input = input();
        input.name = Some("   ".to_owned());
        input.text = Some("\n\t".to_owned());

        let errors = validate_input(&normalize(input), true).unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["name"][0].code, "blank");
        assert_eq!(fields["text"][0].code, "blank");
    }

    #[test]
    fn normalize_trims_name() {
        let mut input = input();
        input.name = Some("  Pancakes ".to_owned());
        assert_eq!(normalize(input).name.as_deref(), Some("Pancakes"));
    }

    #[test]
    fn scalar_bounds() {
        let mut input = input();
        input.name = Some("x".repeat(73));
        input.cooking_time = Some(0);

        let errors = validate_input(&input, false).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("cooking_time"));
    }
}
