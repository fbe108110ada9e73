//! Rongo University catalog: schools, departments and courses.

pub const SCHOOLS: &[(&str, &str)] = &[
    ("school-agriculture", "School of Agriculture and Food Security"),
    ("school-business", "School of Business and Economics"),
    ("school-education", "School of Education"),
    ("school-health", "School of Health Sciences"),
    ("school-arts", "School of Humanities and Social Sciences"),
    ("school-science", "School of Physical and Biological Sciences"),
];

// (id, school_id, name)
pub const DEPARTMENTS: &[(&str, &str, &str)] = &[
    ("dept-agricultural-economics", "school-agriculture", "Department of Agricultural Economics and Agribusiness Management"),
    ("dept-animal-science", "school-agriculture", "Department of Animal Science"),
    ("dept-crop-science", "school-agriculture", "Department of Crop Science and Horticulture"),
    ("dept-soil-science", "school-agriculture", "Department of Soil Science"),
    ("dept-accounting", "school-business", "Department of Accounting and Finance"),
    ("dept-economics", "school-business", "Department of Economics"),
    ("dept-management", "school-business", "Department of Management Science"),
    ("dept-curriculum", "school-education", "Department of Curriculum Instruction and Educational Media"),
    ("dept-educational-admin", "school-education", "Department of Educational Administration and Planning"),
    ("dept-educational-psych", "school-education", "Department of Educational Psychology"),
    ("dept-special-needs", "school-education", "Department of Special Needs Education"),
    ("dept-community-health", "school-health", "Department of Community Health"),
    ("dept-nursing", "school-health", "Department of Nursing"),
    ("dept-nutrition", "school-health", "Department of Nutrition and Dietetics"),
    ("dept-languages", "school-arts", "Department of Languages and Literature"),
    ("dept-history", "school-arts", "Department of History and Archaeology"),
    ("dept-philosophy", "school-arts", "Department of Philosophy and Religious Studies"),
    ("dept-sociology", "school-arts", "Department of Sociology and Social Work"),
    ("dept-biological", "school-science", "Department of Biological Sciences"),
    ("dept-chemistry", "school-science", "Department of Chemistry"),
    ("dept-mathematics", "school-science", "Department of Mathematics and Computer Science"),
    ("dept-physics", "school-science", "Department of Physics"),
];

// (id, department_id, code, name)
pub const COURSES: &[(&str, &str, &str, &str)] = &[
    ("course-agec-101", "dept-agricultural-economics", "AGEC 101", "Introduction to Agricultural Economics"),
    ("course-agec-201", "dept-agricultural-economics", "AGEC 201", "Farm Management"),
    ("course-agec-301", "dept-agricultural-economics", "AGEC 301", "Agricultural Marketing"),
    ("course-agec-401", "dept-agricultural-economics", "AGEC 401", "Agricultural Policy Analysis"),
    ("course-ansc-101", "dept-animal-science", "ANSC 101", "Introduction to Animal Science"),
    ("course-ansc-201", "dept-animal-science", "ANSC 201", "Animal Nutrition"),
    ("course-ansc-301", "dept-animal-science", "ANSC 301", "Animal Breeding and Genetics"),
    ("course-ansc-401", "dept-animal-science", "ANSC 401", "Livestock Production Systems"),
    ("course-crsc-101", "dept-crop-science", "CRSC 101", "Introduction to Crop Science"),
    ("course-crsc-201", "dept-crop-science", "CRSC 201", "Plant Breeding"),
    ("course-crsc-301", "dept-crop-science", "CRSC 301", "Horticulture Production"),
    ("course-crsc-401", "dept-crop-science", "CRSC 401", "Sustainable Agriculture"),
    ("course-soil-101", "dept-soil-science", "SOIL 101", "Introduction to Soil Science"),
    ("course-soil-201", "dept-soil-science", "SOIL 201", "Soil Chemistry"),
    ("course-soil-301", "dept-soil-science", "SOIL 301", "Soil Fertility Management"),
    ("course-soil-401", "dept-soil-science", "SOIL 401", "Soil Conservation"),
    ("course-acc-101", "dept-accounting", "ACC 101", "Principles of Accounting"),
    ("course-acc-201", "dept-accounting", "ACC 201", "Financial Accounting"),
    ("course-acc-301", "dept-accounting", "ACC 301", "Management Accounting"),
    ("course-fin-101", "dept-accounting", "FIN 101", "Corporate Finance"),
    ("course-fin-201", "dept-accounting", "FIN 201", "Investment Analysis"),
    ("course-econ-101", "dept-economics", "ECON 101", "Microeconomics"),
    ("course-econ-102", "dept-economics", "ECON 102", "Macroeconomics"),
    ("course-econ-201", "dept-economics", "ECON 201", "Development Economics"),
    ("course-econ-301", "dept-economics", "ECON 301", "International Economics"),
    ("course-mgmt-101", "dept-management", "MGMT 101", "Principles of Management"),
    ("course-mgmt-201", "dept-management", "MGMT 201", "Human Resource Management"),
    ("course-mgmt-301", "dept-management", "MGMT 301", "Strategic Management"),
    ("course-mkt-101", "dept-management", "MKT 101", "Principles of Marketing"),
    ("course-curr-101", "dept-curriculum", "CURR 101", "Curriculum Development"),
    ("course-curr-201", "dept-curriculum", "CURR 201", "Instructional Design"),
    ("course-edm-101", "dept-curriculum", "EDM 101", "Educational Media"),
    ("course-edm-201", "dept-curriculum", "EDM 201", "Educational Technology"),
    ("course-edap-101", "dept-educational-admin", "EDAP 101", "Educational Administration"),
    ("course-edap-201", "dept-educational-admin", "EDAP 201", "Educational Planning"),
    ("course-edap-301", "dept-educational-admin", "EDAP 301", "School Management"),
    ("course-edap-401", "dept-educational-admin", "EDAP 401", "Educational Leadership"),
    ("course-edps-101", "dept-educational-psych", "EDPS 101", "Introduction to Educational Psychology"),
    ("course-edps-201", "dept-educational-psych", "EDPS 201", "Child Development"),
    ("course-edps-301", "dept-educational-psych", "EDPS 301", "Learning Theories"),
    ("course-edps-401", "dept-educational-psych", "EDPS 401", "Assessment and Evaluation"),
    ("course-sne-101", "dept-special-needs", "SNE 101", "Introduction to Special Needs Education"),
    ("course-sne-201", "dept-special-needs", "SNE 201", "Inclusive Education"),
    ("course-sne-301", "dept-special-needs", "SNE 301", "Learning Disabilities"),
    ("course-sne-401", "dept-special-needs", "SNE 401", "Assistive Technology"),
    ("course-ch-101", "dept-community-health", "CH 101", "Introduction to Community Health"),
    ("course-ch-201", "dept-community-health", "CH 201", "Epidemiology"),
    ("course-ch-301", "dept-community-health", "CH 301", "Health Promotion"),
    ("course-ch-401", "dept-community-health", "CH 401", "Environmental Health"),
    ("course-nurs-101", "dept-nursing", "NURS 101", "Fundamentals of Nursing"),
    ("course-nurs-201", "dept-nursing", "NURS 201", "Medical-Surgical Nursing"),
    ("course-nurs-301", "dept-nursing", "NURS 301", "Pediatric Nursing"),
    ("course-nurs-401", "dept-nursing", "NURS 401", "Community Health Nursing"),
    ("course-nutr-101", "dept-nutrition", "NUTR 101", "Introduction to Nutrition"),
    ("course-nutr-201", "dept-nutrition", "NUTR 201", "Clinical Nutrition"),
    ("course-nutr-301", "dept-nutrition", "NUTR 301", "Community Nutrition"),
    ("course-nutr-401", "dept-nutrition", "NUTR 401", "Food Service Management"),
    ("course-eng-101", "dept-languages", "ENG 101", "English Literature"),
    ("course-eng-201", "dept-languages", "ENG 201", "Creative Writing"),
    ("course-kis-101", "dept-languages", "KIS 101", "Kiswahili Grammar"),
    ("course-kis-201", "dept-languages", "KIS 201", "Kiswahili Literature"),
    ("course-hist-101", "dept-history", "HIST 101", "African History"),
    ("course-hist-201", "dept-history", "HIST 201", "Kenyan History"),
    ("course-arch-101", "dept-history", "ARCH 101", "Introduction to Archaeology"),
    ("course-arch-201", "dept-history", "ARCH 201", "Cultural Heritage"),
    ("course-phil-101", "dept-philosophy", "PHIL 101", "Introduction to Philosophy"),
    ("course-phil-201", "dept-philosophy", "PHIL 201", "Ethics and Morality"),
    ("course-rel-101", "dept-philosophy", "REL 101", "Comparative Religion"),
    ("course-rel-201", "dept-philosophy", "REL 201", "African Traditional Religion"),
    ("course-soc-101", "dept-sociology", "SOC 101", "Introduction to Sociology"),
    ("course-soc-201", "dept-sociology", "SOC 201", "Social Research Methods"),
    ("course-sw-101", "dept-sociology", "SW 101", "Introduction to Social Work"),
    ("course-sw-201", "dept-sociology", "SW 201", "Community Development"),
    ("course-bio-101", "dept-biological", "BIO 101", "General Biology"),
    ("course-bio-201", "dept-biological", "BIO 201", "Genetics"),
    ("course-bio-301", "dept-biological", "BIO 301", "Ecology"),
    ("course-bio-401", "dept-biological", "BIO 401", "Molecular Biology"),
    ("course-chem-101", "dept-chemistry", "CHEM 101", "General Chemistry"),
    ("course-chem-201", "dept-chemistry", "CHEM 201", "Organic Chemistry"),
    ("course-chem-301", "dept-chemistry", "CHEM 301", "Physical Chemistry"),
    ("course-chem-401", "dept-chemistry", "CHEM 401", "Analytical Chemistry"),
    ("course-math-101", "dept-mathematics", "MATH 101", "Calculus I"),
    ("course-math-201", "dept-mathematics", "MATH 201", "Linear Algebra"),
    ("course-cs-101", "dept-mathematics", "CS 101", "Introduction to Programming"),
    ("course-cs-201", "dept-mathematics", "CS 201", "Data Structures"),
    ("course-cs-301", "dept-mathematics", "CS 301", "Database Systems"),
    ("course-phys-101", "dept-physics", "PHYS 101", "General Physics"),
    ("course-phys-201", "dept-physics", "PHYS 201", "Classical Mechanics"),
    ("course-phys-301", "dept-physics", "PHYS 301", "Electromagnetism"),
    ("course-phys-401", "dept-physics", "PHYS 401", "Quantum Physics"),
];
