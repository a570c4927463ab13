#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

pub const ACTIVE_HEADER: [&str; 5] = ["Рег. номер", "Име", "Място", "Тип", "Free"];
pub const DELETED_HEADER: [&str; 4] = ["Рег. номер", "Име", "Дата", "Място"];
pub const MASTER_HEADER: [&str; 3] = ["Място", "Зона", "Свободно"];

/// Sector letter, zone text, allocated spots, free spots.
pub const SAMPLE_ZONES: [(char, &str, usize, usize); 7] = [
    ('А', "Подземен", 19, 9),
    ('В', "Покрит паркинг", 10, 5),
    ('С', "Малък английски двор", 8, 4),
    ('Е', "Голям английски двор", 6, 3),
    ('Р', "Паркинг печатница", 4, 2),
    ('Д', "Депо", 3, 2),
    ('Т', "Входна алея", 3, 2),
];

pub type Rows = Vec<Vec<String>>;

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

/// Writes a workbook with the given sheets. Empty strings stay empty cells.
pub fn write_workbook(path: &Path, sheets: &[(&str, Rows)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet named");
        for (row_idx, cells) in rows.iter().enumerate() {
            for (col_idx, cell) in cells.iter().enumerate() {
                if !cell.is_empty() {
                    worksheet
                        .write_string(row_idx as u32, col_idx as u16, cell)
                        .expect("cell written");
                }
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

pub fn with_header(header: &[&str], rows: Rows) -> Rows {
    let mut all = vec![row(header)];
    all.extend(rows);
    all
}

fn latin_twin(letter: char) -> char {
    match letter {
        'А' => 'A',
        'В' => 'B',
        'С' => 'C',
        'Е' => 'E',
        'Р' => 'P',
        'Т' => 'T',
        other => other,
    }
}

/// Active assignment rows of the documented sample: 53 employees over seven
/// zones, half of them typed with Latin sector letters.
pub fn sample_active_rows() -> Rows {
    let mut rows = Vec::new();
    let mut index = 0usize;
    for (letter, zone_text, allocated, _) in SAMPLE_ZONES {
        for number in 1..=allocated {
            index += 1;
            let letter = if index % 2 == 0 { latin_twin(letter) } else { letter };
            let location = format!("{letter}{number} - {}", zone_text.to_uppercase());
            let registration = if index == 1 {
                "CB0001AB / M-12345".to_string()
            } else if index % 10 == 9 {
                format!("W-{index:05}")
            } else if index % 2 == 0 {
                format!("СВ{index:04}АВ")
            } else {
                format!("CB{index:04}AB")
            };
            let ownership = if index % 5 == 0 { "Служебен" } else { "Личен" };
            rows.push(vec![
                registration,
                format!("Служител {index}"),
                location,
                ownership.to_string(),
                String::new(),
            ]);
        }
    }
    rows
}

/// Master table of the documented sample: 80 spots, the free ones marked
/// "да", half of the assigned ones marked "не" and the rest left blank.
pub fn sample_master_rows() -> Rows {
    let mut rows = Vec::new();
    for (letter, zone_text, allocated, free) in SAMPLE_ZONES {
        for number in 1..=(allocated + free) {
            let marker = if number > allocated {
                "да"
            } else if number % 2 == 0 {
                "не"
            } else {
                ""
            };
            let spot = format!("{letter}{number}");
            rows.push(row(&[spot.as_str(), zone_text, marker]));
        }
    }
    rows
}

pub fn sample_deleted_rows() -> Rows {
    vec![
        row(&["PB1111BB", "Бивш Служител", "01.01.2024", "Т9 - Входна алея"]),
        row(&["CB0002AB", "Служител 2", "01.02.2024", ""]),
    ]
}

/// Writes the documented sample inputs into `dir`, returning
/// `(assignments, master)` paths.
pub fn write_sample(dir: &Path) -> (PathBuf, PathBuf) {
    let assignments = dir.join("Parking table.xlsx");
    let master = dir.join("master.xlsx");
    write_workbook(
        &assignments,
        &[
            ("Постоянни паркоместа", with_header(&ACTIVE_HEADER, sample_active_rows())),
            ("Изтрити", with_header(&DELETED_HEADER, sample_deleted_rows())),
        ],
    );
    write_workbook(
        &master,
        &[("Паркоместа", with_header(&MASTER_HEADER, sample_master_rows()))],
    );
    (assignments, master)
}
