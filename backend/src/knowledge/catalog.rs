pub struct DiseaseEntry {
    pub disease: &'static str,
    pub description: &'static str,
    pub mechanism: &'static str,
    pub transmission: &'static str,
    pub prevention: &'static [&'static str],
    pub complications: &'static [&'static str],
}

pub const CATALOG: &[DiseaseEntry] = &[
    DiseaseEntry {
        disease: "Acne",
        description: "Acne is a common skin condition where pores become clogged with excess oil and dead skin cells, producing blackheads, whiteheads and pimples.",
        mechanism: "Acne begins when hair follicles (pores) get plugged by substances like sebum (oil), bacteria or dead skin cells, creating inflamed bumps (pimples).",
        transmission: "Acne is not contagious; you cannot catch it from another person.",
        prevention: &[
            "Wash your face gently with warm water and a mild cleanser once or twice a day.",
            "Use oil-free or non-comedogenic moisturizers and cosmetics to avoid clogging pores.",
            "Avoid squeezing or picking at pimples; let the skin heal naturally to prevent scars.",
        ],
        complications: &[
            "Scarring: Deep or persistent acne can leave pitted scars or thick (keloid) scars.",
            "Skin discoloration: After acne clears, the affected skin may remain darker or lighter than normal.",
        ],
    },
    DiseaseEntry {
        disease: "Eczema",
        description: "Atopic dermatitis (eczema) is a chronic, non-contagious skin condition that causes dry, itchy and inflamed skin. It often begins in childhood and can flare periodically.",
        mechanism: "Eczema arises when a person's skin barrier is weakened (often due to genetic factors), allowing irritants or allergens to penetrate and trigger inflammation.",
        transmission: "Eczema is not contagious; it cannot be passed from person to person.",
        prevention: &[
            "Moisturize the skin at least twice daily (e.g. with creams or petroleum jelly) to keep it hydrated.",
            "Take warm (not hot), brief showers or baths using gentle, fragrance-free cleansers, then pat the skin dry and apply moisturizer.",
            "Identify and avoid triggers (such as rough fabrics, harsh soaps, extreme temperatures or known allergens).",
        ],
        complications: &[
            "Asthma, hay fever and food allergies often develop in people with eczema.",
            "Chronic scratching can thicken and discolor the skin (lichenification, hyperpigmentation or hypopigmentation).",
            "Broken skin from scratching increases the risk of bacterial or viral skin infections.",
            "Eczema can disrupt sleep and lead to anxiety or depression due to chronic itching.",
        ],
    },
    DiseaseEntry {
        disease: "Psoriasis",
        description: "Psoriasis is an autoimmune skin disease in which the immune system causes red, scaly patches (plaques) on the skin. The most common type (plaque psoriasis) produces raised, itchy areas covered with silvery scales.",
        mechanism: "In psoriasis, the immune system becomes overactive and attacks the skin, causing inflammation and rapid overgrowth of skin cells.",
        transmission: "Psoriasis is not contagious; you cannot get it from another person.",
        prevention: &[
            "Maintain a healthy lifestyle (balanced diet, regular exercise, no smoking) and follow any treatment plan prescribed by a doctor to control symptoms.",
            "Avoid known triggers of flares, such as severe stress, skin injury (cuts, sunburn), infections (strep throat) and certain medications.",
            "Keep skin moisturized and protect it from trauma or sunburn to reduce flare-ups.",
        ],
        complications: &[
            "Psoriatic arthritis: many people with psoriasis develop inflammatory joint pain and swelling.",
            "Metabolic and cardiovascular risks: psoriasis is linked to higher rates of obesity, diabetes, high cholesterol, heart attack and stroke.",
            "Chronic discomfort and visibility can also impact emotional well-being (stress, self-esteem issues).",
        ],
    },
    DiseaseEntry {
        disease: "FU-ringworm",
        description: "Ringworm (tinea) is a common, itchy fungal infection of the skin. It causes a ring-shaped red rash with clearer skin in the middle.",
        mechanism: "It occurs when fungi on the skin invade through small cuts or abrasions, infecting the outer layer of skin.",
        transmission: "Ringworm is highly contagious. The fungus spreads by direct skin-to-skin contact with an infected person or animal, and by sharing contaminated items (such as towels, clothing or sports gear).",
        prevention: &[
            "Keep skin clean and dry; shower and change socks and underwear daily, especially after sweating.",
            "Wear footwear in public showers, locker rooms and pool areas.",
            "Avoid sharing personal items like towels, clothing or hairbrushes.",
            "Treat infected pets (e.g. cats, dogs) and avoid contact with animals that have skin lesions.",
        ],
        complications: &[
            "If it infects the scalp, ringworm can cause scaly bald patches; if untreated, the hair loss can become permanent.",
            "It can spread to fingernails or toenails, causing thickened, brittle nails (onychomycosis).",
            "Repeated scratching may lead to secondary bacterial infection of the skin.",
        ],
    },
    DiseaseEntry {
        disease: "BA- cellulitis",
        description: "Cellulitis is a bacterial skin infection of the deeper layers of skin and underlying tissue. It causes redness, swelling, warmth and pain in the affected area, often on the legs.",
        mechanism: "Cellulitis happens when bacteria (usually strep or staph) enter through a crack or break in the skin (such as a cut, insect bite, surgical wound or rash).",
        transmission: "Cellulitis itself is not spread from person to person; it is caused by bacteria entering the skin. However, the bacteria (strep/staph) can sometimes be spread through contact with infected wounds.",
        prevention: &[
            "Clean and cover any cuts, scrapes or insect bites right away; wash wounds with soap and water and apply antibiotic ointment, then keep them covered.",
            "Keep skin moisturized to prevent cracks; check and care for skin daily if you have diabetes or poor circulation.",
            "Treat underlying skin conditions (like athlete's foot) promptly and wear protective footwear or gloves to avoid injury.",
        ],
        complications: &[
            "Bacteria may spread to the bloodstream (bacteremia) causing sepsis.",
            "Necrotizing fasciitis (flesh-eating disease) or infection of deeper tissues in severe cases.",
            "Recurrent cellulitis can cause chronic swelling of the affected limb (lymphedema).",
            "Infection can extend to bones (osteomyelitis) or heart valves (endocarditis) in rare cases.",
        ],
    },
    DiseaseEntry {
        disease: "BA-impetigo",
        description: "Impetigo is a highly contagious bacterial skin infection, most common in infants and young children. It appears as red sores or blisters (often around the nose and mouth) that burst and form yellowish-brown crusts.",
        mechanism: "Impetigo is caused by bacteria (usually staph or strep) entering the skin, often through minor cuts, insect bites or other breaks in the skin.",
        transmission: "Impetigo spreads very easily by close contact. It can be transmitted through direct skin contact with the sores or by touching objects and surfaces (like towels, bedding, toys) that have the bacteria on them.",
        prevention: &[
            "Keep skin clean and treat cuts or scratches promptly: wash minor wounds right away and cover them with a bandage.",
            "Do not share personal items (towels, clothing, toys, etc.) with infected individuals.",
            "Wash the hands of infected individuals frequently and wear gloves when applying antibiotics.",
            "Keep fingernails trimmed to minimize skin damage from scratching.",
        ],
        complications: &[
            "Cellulitis: the infection can spread to deeper skin layers and cause serious cellulitis.",
            "Post-streptococcal glomerulonephritis: some strep bacteria can trigger kidney inflammation.",
            "Scarring: if lesions extend deep into the skin (ecthyma), they may leave scars.",
        ],
    },
    DiseaseEntry {
        disease: "Warts",
        description: "Warts are common benign skin growths caused by certain strains of human papillomavirus (HPV). They often appear as rough, raised bumps on hands or feet, or fleshy nodules on the genitals.",
        mechanism: "The virus enters through tiny cuts or abrasions in the skin, causing extra cell growth that forms a wart.",
        transmission: "Warts are contagious. HPV is spread by direct skin contact (touching another person's wart) and by indirect contact (using objects like towels or razors that have touched a wart).",
        prevention: &[
            "Avoid touching warts (yours or others') and do not pick or bite at warts.",
            "Do not share personal items such as towels, socks, shoes, or nail clippers.",
            "Keep skin moist and healthy; avoid cracked skin where the virus can enter.",
            "Use the HPV vaccine (for genital warts) and wear shoes in public showers or pool areas.",
        ],
        complications: &[
            "Plantar warts (on the feet) can become painful when walking.",
            "Warts may recur or spread to other areas if untreated.",
            "Genital warts indicate HPV infection; appropriate monitoring for related cancers is important.",
        ],
    },
    DiseaseEntry {
        disease: "Lupus",
        description: "Lupus is an autoimmune disease in which the immune system attacks its own tissues, causing inflammation. It often affects the skin, joints, kidneys, brain and other organs. A common sign is a butterfly-shaped rash on the face over the cheeks and nose.",
        mechanism: "People with a genetic predisposition can develop lupus when exposed to triggers like sunlight (UV light), certain infections or medications.",
        transmission: "Lupus is not contagious and cannot be passed from person to person.",
        prevention: &[
            "There is no known way to prevent lupus, but patients can reduce flares by avoiding triggers (e.g. sun exposure).",
            "Manage infections promptly, avoid smoking and discuss safe medications with a doctor to minimize risk factors.",
        ],
        complications: &[
            "Kidney damage (lupus nephritis) leading to kidney failure.",
            "Neurological problems: lupus can cause headaches, seizures, strokes, and cognitive difficulties.",
            "Blood disorders: increased risk of blood clots, anemia and bleeding problems.",
            "Heart and lung inflammation: higher risk of pericarditis, pleurisy, and heart disease.",
            "Pregnancy complications: higher risk of miscarriage, preterm birth and high blood pressure.",
        ],
    },
    DiseaseEntry {
        disease: "SkinCancer",
        description: "Skin cancer is a disease in which skin cells grow abnormally and can form tumors. It is often caused by DNA damage from ultraviolet (UV) radiation (sunlight or tanning beds). The main types are basal cell carcinoma, squamous cell carcinoma, and melanoma (the most serious, as it can spread).",
        mechanism: "Exposure to UV light causes mutations in skin cell DNA, triggering cells to grow and divide in an uncontrolled way.",
        transmission: "Skin cancer is not contagious. However, if malignant cells break away, they can invade nearby tissue or spread (metastasize) to lymph nodes or other parts of the body.",
        prevention: &[
            "Protect your skin from UV exposure: use broad-spectrum sunscreen (SPF 30+) daily, wear protective clothing and seek shade during peak sun hours.",
            "Avoid indoor tanning and intentional sunburns.",
            "Perform regular skin self-exams and get routine check-ups for any suspicious moles or lesions.",
        ],
        complications: &[
            "Advanced skin cancers, especially melanoma, can spread to lymph nodes and distant organs.",
            "Late-stage skin cancer may require extensive surgery or radiation, which can be disfiguring.",
            "Untreated melanoma can be fatal.",
        ],
    },
    DiseaseEntry {
        disease: "chickenpox",
        description: "Chickenpox is a highly contagious viral infection caused by the varicella-zoster virus. It causes an itchy rash of red bumps and blisters all over the body.",
        mechanism: "The virus enters the body through the respiratory tract or by direct contact with chickenpox blisters.",
        transmission: "Chickenpox spreads very easily from person to person. It is transmitted through close contact, such as breathing in virus particles from coughs or sneezes, and by touching the rash of an infected person.",
        prevention: &[
            "Vaccination with the varicella (chickenpox) vaccine is the best prevention; two doses are recommended and prevent about 90% of cases.",
            "Keep infected individuals isolated until all blisters have crusted to avoid spreading the virus to others.",
            "Wash hands frequently and disinfect surfaces to reduce transmission.",
        ],
        complications: &[
            "Bacterial skin infections: scratching blisters can introduce bacteria into the skin.",
            "Pneumonia (lung infection) or encephalitis (brain inflammation) can occur.",
            "Dehydration or (in aspirin-treated children) Reye's syndrome.",
            "In rare cases, severe infection can lead to hospitalization or death, especially in high-risk individuals.",
        ],
    },
];

pub const GENERIC_PREVENTION: &[&str] = &[
    "Maintain good skin hygiene",
    "Avoid sharing personal items like towels and clothing",
    "Keep the affected area clean and dry",
    "Consult with a dermatologist for specific prevention strategies",
];

pub const GENERIC_COMPLICATIONS: &[&str] = &[
    "Potential for secondary bacterial infection if scratched",
    "Possible scarring or skin discoloration",
    "Consult healthcare provider to understand specific risks",
];
