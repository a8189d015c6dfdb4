//! Tests for the category co-occurrence matrix.

use datapages::cooccurrence::{MatrixMode, build_matrix};
use datapages::error::AppError;

fn pairs(rows: &[(&str, &str)]) -> Vec<(String, String)> {
    rows.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_counts_both_orders() {
    let rows = pairs(&[("Fire", "Water"), ("Fire", "Water"), ("Water", "Fire")]);
    let matrix = build_matrix(&rows, &names(&["Fire", "Water", "Grass"]), MatrixMode::Count).unwrap();

    assert_eq!(matrix.get_by_label("Fire", "Water"), Some(3.0));
    assert_eq!(matrix.get_by_label("Water", "Fire"), Some(3.0));
    assert_eq!(matrix.get_by_label("Fire", "Grass"), Some(0.0));
    assert_eq!(matrix.get_by_label("Fire", "Rock"), None);
    println!("✓ Fire/Water counted 3 times in either order");
}

#[test]
fn test_symmetric_with_zero_diagonal() {
    let rows = pairs(&[
        ("Bug", "Flying"),
        ("Grass", "Poison"),
        ("Poison", "Grass"),
        ("Grass", "Grass"),
        ("Flying", "Normal"),
        ("Bug", "Poison"),
    ]);
    let selected = names(&["Bug", "Flying", "Grass", "Poison", "Normal"]);
    let matrix = build_matrix(&rows, &selected, MatrixMode::Count).unwrap();

    assert_eq!(matrix.dimension(), 5);
    for i in 0..5 {
        assert_eq!(matrix.get(i, i), 0.0);
        for j in 0..5 {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
        }
    }
    println!("✓ matrix is symmetric with a zero diagonal");
}

#[test]
fn test_upper_triangle_sums_to_qualifying_rows() {
    let rows = pairs(&[
        ("Bug", "Flying"),
        ("Grass", "Poison"),
        ("Poison", "Grass"),
        ("Grass", "Grass"),
        ("Flying", "Normal"),
        ("Bug", "Poison"),
        ("Dragon", "Bug"),
    ]);
    let selected = names(&["Bug", "Flying", "Grass", "Poison"]);
    let matrix = build_matrix(&rows, &selected, MatrixMode::Count).unwrap();

    let mut total = 0.0;
    for i in 0..4 {
        for j in (i + 1)..4 {
            total += matrix.get(i, j);
        }
    }
    // Bug/Flying, Grass/Poison twice, Bug/Poison
    assert_eq!(total, 4.0);
    println!("✓ upper triangle sums to the 4 qualifying rows");
}

#[test]
fn test_percentage_mode() {
    let rows = pairs(&[("Fire", "Water"), ("Water", "Fire"), ("Grass", "Fire")]);
    let matrix =
        build_matrix(&rows, &names(&["Fire", "Water", "Grass"]), MatrixMode::Percentage).unwrap();

    assert_eq!(matrix.mode(), MatrixMode::Percentage);
    assert_eq!(matrix.get_by_label("Fire", "Water"), Some(66.67));
    assert_eq!(matrix.get_by_label("Fire", "Grass"), Some(33.33));
    assert_eq!(matrix.get_by_label("Water", "Grass"), Some(0.0));
    println!("✓ percentages of total rows with 2 decimals");
}

#[test]
fn test_percentage_of_no_rows_is_zero() {
    let matrix = build_matrix(&[], &names(&["A", "B"]), MatrixMode::Percentage).unwrap();
    assert_eq!(matrix.get(0, 1), 0.0);
    println!("✓ empty dataset gives an all-zero matrix");
}

#[test]
fn test_single_category_is_rejected() {
    let rows = pairs(&[("Fire", "Water")]);
    let err = build_matrix(&rows, &names(&["Fire"]), MatrixMode::Count).unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientSelection {
            required: 2,
            actual: 1
        }
    ));
    assert!(err.user_message().contains("at least 2"));
    println!("✓ one selected category is rejected");
}

#[test]
fn test_duplicate_selection_collapses() {
    let rows = pairs(&[("Fire", "Water")]);
    let err = build_matrix(&rows, &names(&["Fire", "Fire"]), MatrixMode::Count).unwrap_err();
    assert!(matches!(err, AppError::InsufficientSelection { actual: 1, .. }));

    let matrix =
        build_matrix(&rows, &names(&["Water", "Fire", "Water"]), MatrixMode::Count).unwrap();
    assert_eq!(matrix.labels(), &names(&["Water", "Fire"])[..]);
    assert_eq!(matrix.rows(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    println!("✓ duplicate categories are counted once, order kept");
}
